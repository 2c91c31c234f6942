use super::{symbol, BindingStrategy, Strategy};
use crate::resolve::BindingTable;
use shard_core::Result;

/// Classic register binding: one constant buffer per slot, with textures
/// and samplers bound to sequential registers in the slot's space
#[derive(Debug, Clone, Copy, Default)]
pub struct Legacy;

impl BindingStrategy for Legacy {
    fn strategy(&self) -> Strategy {
        Strategy::Legacy
    }

    fn emit(&self, table: &BindingTable) -> Result<String> {
        let mut out = String::from("\n// rx legacy bindings\n");

        for slot in table.slots.iter().filter(|slot| !slot.is_empty()) {
            let space = slot.slot.index();
            out.push_str(&format!(
                "\n// {}: {}\n",
                slot.slot,
                slot.group_name.as_deref().unwrap_or("<local>")
            ));

            if !slot.constants.is_empty() {
                out.push_str(&format!(
                    "cbuffer RxResGroup{} : register(b0, space{})\n{{\n",
                    space, space
                ));
                for constant in &slot.constants {
                    out.push_str(&format!(
                        "    {} {};\n",
                        constant.type_name,
                        symbol(slot, constant)
                    ));
                }
                out.push_str("};\n");
            }
            for texture in &slot.textures {
                out.push_str(&format!(
                    "Texture2D {} : register(t{}, space{});\n",
                    symbol(slot, texture),
                    texture.slot,
                    space
                ));
            }
            for sampler in &slot.samplers {
                out.push_str(&format!(
                    "SamplerState {} : register(s{}, space{});\n",
                    symbol(slot, sampler),
                    sampler.slot,
                    space
                ));
            }
        }

        for (slot, resource) in table.iter() {
            out.push_str(&format!(
                "\n{} {}()\n{{\n    return {};\n}}\n",
                resource.type_name,
                resource.name,
                symbol(slot, resource)
            ));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_block;
    use shard_parse::parse;

    fn emit(source: &str) -> String {
        let model = parse(source, "test.shard").unwrap();
        let table = resolve_block(&model.code_blocks[0], &model.group_registry()).unwrap();
        Legacy.emit(&table).unwrap()
    }

    #[test]
    fn test_constant_buffer_per_slot() {
        let text = emit(
            "[Code]\nname=C\n\
             [[rx::resGroup1()]] float4 tint();\n\
             [[rx::resGroup1()]] float gloss();\n",
        );
        assert!(text.contains("cbuffer RxResGroup1 : register(b0, space1)"));
        assert!(text.contains("    float4 rx_resGroup1_tint;\n"));
        assert!(text.contains("    float rx_resGroup1_gloss;\n"));
        assert!(!text.contains("offset"));
        assert!(text.contains("float gloss()\n{\n    return rx_resGroup1_gloss;\n}\n"));
    }

    #[test]
    fn test_texture_and_sampler_registers() {
        let text = emit(
            "[Code]\nname=C\n\
             [[rx::dynResGroup1()]] Texture2D albedo();\n\
             [[rx::dynResGroup1()]] Texture2D normal();\n\
             [[rx::dynResGroup1()]] SamplerState linear();\n",
        );
        assert!(text.contains("Texture2D rx_dynResGroup1_albedo : register(t0, space5);"));
        assert!(text.contains("Texture2D rx_dynResGroup1_normal : register(t1, space5);"));
        assert!(text.contains("SamplerState rx_dynResGroup1_linear : register(s0, space5);"));
        assert!(!text.contains("cbuffer"));
    }

    #[test]
    fn test_empty_table() {
        let text = emit("[Code]\nname=C\nfloat4 main();\n");
        assert_eq!(text, "\n// rx legacy bindings\n");
    }
}
