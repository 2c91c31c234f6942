use super::{BindingStrategy, Strategy};
use crate::resolve::{BindingTable, ResolvedResource, ResolvedSlot};
use shard_core::{Result, ShardError};
use shard_resource::{ConstantType, GroupSlot, ResourceKind, Scalar, WORD_SIZE};

/// Register space holding the group data buffers
pub const DATA_SPACE: u32 = 100;
/// Register space of the global texture array
pub const TEXTURE_SPACE: u32 = 101;
/// Register space of the global sampler array
pub const SAMPLER_SPACE: u32 = 102;

/// Bindless binding: every group is a run of 4-byte words in a byte-address
/// buffer. A push constant holds the word index of each slot's data. Textures
/// and samplers are stored as indices into global descriptor arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bindless;

impl Bindless {
    fn buffer(slot: GroupSlot) -> &'static str {
        if slot.is_dynamic() {
            "rx_DynamicData"
        } else {
            "rx_StaticData"
        }
    }

    fn load(
        table: &BindingTable,
        slot: &ResolvedSlot,
        resource: &ResolvedResource,
    ) -> Result<String> {
        let buffer = Self::buffer(slot.slot);
        let expr = match resource.kind {
            ResourceKind::Constant => {
                let ty = ConstantType::parse(&resource.type_name).ok_or_else(|| {
                    ShardError::SpliceError {
                        block: table.block.clone(),
                        message: format!(
                            "cannot load constant `{}` of type {}",
                            resource.name, resource.type_name
                        ),
                    }
                })?;
                let raw = match ty.components {
                    1 => format!("{}.Load(address)", buffer),
                    n => format!("{}.Load{}(address)", buffer, n),
                };
                match ty.scalar {
                    Scalar::Float => format!("asfloat({})", raw),
                    Scalar::Int => format!("asint({})", raw),
                    Scalar::Uint => raw,
                    Scalar::Bool => format!("({} != 0)", raw),
                }
            }
            ResourceKind::Texture => {
                format!("rx_Textures[NonUniformResourceIndex({}.Load(address))]", buffer)
            }
            ResourceKind::Sampler => {
                format!("rx_Samplers[NonUniformResourceIndex({}.Load(address))]", buffer)
            }
        };
        Ok(expr)
    }
}

impl BindingStrategy for Bindless {
    fn strategy(&self) -> Strategy {
        Strategy::Bindless
    }

    fn emit(&self, table: &BindingTable) -> Result<String> {
        let mut out = String::from("\n// rx bindless bindings\n");
        out.push_str(&format!(
            "struct RxPushConstants\n{{\n    uint groupIndex[{}];\n}};\n",
            GroupSlot::COUNT
        ));
        out.push_str("[[vk::push_constant]] RxPushConstants rx_PushConstants;\n");
        out.push_str(&format!(
            "ByteAddressBuffer rx_StaticData : register(t0, space{});\n",
            DATA_SPACE
        ));
        out.push_str(&format!(
            "ByteAddressBuffer rx_DynamicData : register(t1, space{});\n",
            DATA_SPACE
        ));
        out.push_str(&format!(
            "Texture2D rx_Textures[] : register(t0, space{});\n",
            TEXTURE_SPACE
        ));
        out.push_str(&format!(
            "SamplerState rx_Samplers[] : register(s0, space{});\n",
            SAMPLER_SPACE
        ));

        for (slot, resource) in table.iter() {
            let expr = Self::load(table, slot, resource)?;
            out.push_str(&format!("\n{} {}()\n{{\n", resource.type_name, resource.name));
            out.push_str(&format!(
                "    uint address = rx_PushConstants.groupIndex[{}] * {} + {} * {};\n",
                slot.slot.index(),
                WORD_SIZE,
                WORD_SIZE,
                slot.data_word(resource)
            ));
            out.push_str(&format!("    return {};\n}}\n", expr));
        }

        Ok(out)
    }
}
