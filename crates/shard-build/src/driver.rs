//! Build driver: parse, resolve, splice, compile, reflect, cross-compile

use crate::collaborator::{Reflection, ShaderCompiler, ShaderReflector, ShaderStage, TargetDialect};
use crate::config::ShardConfig;
use serde::Serialize;
use shard_binding::{resolve_file, splice_block, SplicedBlock, Strategy};
use shard_core::{Result, ShardError};
use shard_parse::{parse_with_options, RenderProgramDecl, ShaderFileModel};
use std::collections::BTreeMap;
use std::path::Path;

/// One compiled entry point
#[derive(Debug, Clone, Serialize)]
pub struct StageOutput {
    pub stage: ShaderStage,
    pub entry_point: String,
    #[serde(skip)]
    pub blob: Vec<u8>,
    pub reflection: Reflection,
    pub cross_compiled: BTreeMap<TargetDialect, String>,
}

/// Both entry points of a render program
#[derive(Debug, Clone, Serialize)]
pub struct CompiledProgram {
    pub name: String,
    pub code_block: String,
    pub vertex: StageOutput,
    pub pixel: StageOutput,
}

/// Everything produced from one shader file
#[derive(Debug, Serialize)]
pub struct BuildOutput {
    pub model: ShaderFileModel,
    /// Every spliced variant of every code block
    pub spliced: Vec<SplicedBlock>,
    pub programs: Vec<CompiledProgram>,
}

impl BuildOutput {
    pub fn spliced_for(&self, block: &str, strategy: Strategy) -> Option<&SplicedBlock> {
        self.spliced
            .iter()
            .find(|s| s.block == block && s.strategy == strategy)
    }

    pub fn program(&self, name: &str) -> Option<&CompiledProgram> {
        self.programs.iter().find(|p| p.name == name)
    }
}

/// Drives one shader file through the whole pipeline.
///
/// Every failure aborts the build of the current file; nothing is retried.
pub struct BuildDriver {
    config: ShardConfig,
    compiler: Box<dyn ShaderCompiler>,
    reflector: Box<dyn ShaderReflector>,
}

impl BuildDriver {
    pub fn new(
        config: ShardConfig,
        compiler: Box<dyn ShaderCompiler>,
        reflector: Box<dyn ShaderReflector>,
    ) -> Self {
        Self {
            config,
            compiler,
            reflector,
        }
    }

    pub fn config(&self) -> &ShardConfig {
        &self.config
    }

    /// Read and build a shader file from disk
    pub fn build_file(&self, path: &Path) -> Result<BuildOutput> {
        let source = std::fs::read_to_string(path)?;
        self.build(&source, &path.display().to_string())
    }

    /// Build one shader file held in memory
    pub fn build(&self, source: &str, file_name: &str) -> Result<BuildOutput> {
        let model = parse_with_options(source, file_name, &self.config.parse_options())?;
        model.diagnostics.ensure_valid()?;
        log::info!(
            "{}: parsed {} code block(s), {} render program(s)",
            file_name,
            model.code_blocks.len(),
            model.render_programs.len()
        );

        let registry = model.group_registry();
        let resolved = resolve_file(&model, &registry)?;

        let options = self.config.splice_options();
        let mut spliced = Vec::new();
        for strategy in self.config.strategies() {
            let generator = strategy.generator();
            for block in &resolved {
                spliced.push(splice_block(&model, block, generator.as_ref(), options)?);
            }
        }

        let mut programs = Vec::with_capacity(model.render_programs.len());
        for program in &model.render_programs {
            let block = model.code_block_for(program)?;
            let text = spliced
                .iter()
                .find(|s| s.block == block.name && s.strategy == Strategy::Legacy)
                .map(|s| s.text.as_str())
                .ok_or_else(|| ShardError::CodeBlockNotFound(block.name.clone()))?;
            programs.push(self.compile_program(program, &block.name, text)?);
        }

        log::info!("{}: built {} program(s)", file_name, programs.len());
        Ok(BuildOutput {
            model,
            spliced,
            programs,
        })
    }

    fn compile_program(
        &self,
        program: &RenderProgramDecl,
        code_block: &str,
        text: &str,
    ) -> Result<CompiledProgram> {
        let vertex = self.compile_stage(
            text,
            &program.vertex_shader,
            ShaderStage::Vertex,
            &self.config.build.vertex_target,
        )?;
        let pixel = self.compile_stage(
            text,
            &program.pixel_shader,
            ShaderStage::Pixel,
            &self.config.build.pixel_target,
        )?;

        Ok(CompiledProgram {
            name: program.name.clone(),
            code_block: code_block.to_string(),
            vertex,
            pixel,
        })
    }

    fn compile_stage(
        &self,
        text: &str,
        entry_point: &str,
        stage: ShaderStage,
        target: &str,
    ) -> Result<StageOutput> {
        log::debug!("Compiling {} entry point {} ({})", stage, entry_point, target);
        let blob = self
            .compiler
            .compile(text, entry_point, stage, target)
            .map_err(|message| ShardError::CompileError {
                entry_point: entry_point.to_string(),
                message,
            })?;

        let reflection = self
            .reflector
            .reflect(&blob)
            .map_err(|message| ShardError::ReflectError {
                entry_point: entry_point.to_string(),
                message,
            })?;

        let mut cross_compiled = BTreeMap::new();
        for &dialect in &self.config.build.dialects {
            let translated = self
                .reflector
                .cross_compile(&blob, dialect)
                .map_err(|message| ShardError::CrossCompileError {
                    entry_point: entry_point.to_string(),
                    dialect: dialect.to_string(),
                    message,
                })?;
            cross_compiled.insert(dialect, translated);
        }

        Ok(StageOutput {
            stage,
            entry_point: entry_point.to_string(),
            blob,
            reflection,
            cross_compiled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::BoundResource;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every compile request and returns the source bytes as the blob
    #[derive(Default, Clone)]
    struct FakeCompiler {
        calls: Rc<RefCell<Vec<(String, ShaderStage, String)>>>,
        fail_on: Option<String>,
    }

    impl ShaderCompiler for FakeCompiler {
        fn compile(
            &self,
            source: &str,
            entry_point: &str,
            stage: ShaderStage,
            target: &str,
        ) -> std::result::Result<Vec<u8>, String> {
            self.calls
                .borrow_mut()
                .push((entry_point.to_string(), stage, target.to_string()));
            if self.fail_on.as_deref() == Some(entry_point) {
                return Err(format!("error X3004: undeclared identifier in {}", entry_point));
            }
            Ok(source.as_bytes().to_vec())
        }
    }

    struct FakeReflector;

    impl ShaderReflector for FakeReflector {
        fn reflect(&self, blob: &[u8]) -> std::result::Result<Reflection, String> {
            let text = String::from_utf8_lossy(blob);
            let mut reflection = Reflection::default();
            if text.contains("rx_resGroup0_albedo") {
                reflection.textures.push(BoundResource {
                    name: "rx_resGroup0_albedo".to_string(),
                    set: 0,
                    binding: 0,
                });
            }
            Ok(reflection)
        }

        fn cross_compile(
            &self,
            _blob: &[u8],
            dialect: TargetDialect,
        ) -> std::result::Result<String, String> {
            match dialect {
                TargetDialect::Msl => Err("msl backend unavailable".to_string()),
                other => Ok(format!("// {}", other)),
            }
        }
    }

    const SOURCE: &str = "[ResGroup]\nname = Material\nalbedo = Texture2D\n\
                          [RenderProgram]\nname = Lit\nvs = vsMain\nps = psMain\n\
                          [Code]\nname = Body\nresGroup0 = Material\n\
                          [[rx::resGroup0()]] Texture2D albedo();\n\
                          float4 vsMain() : SV_Position { return 0; }\n\
                          float4 psMain() : SV_Target { return 1; }\n";

    fn driver(config: ShardConfig, compiler: FakeCompiler) -> BuildDriver {
        BuildDriver::new(config, Box::new(compiler), Box::new(FakeReflector))
    }

    #[test]
    fn test_build_compiles_both_stages_from_legacy_text() {
        let compiler = FakeCompiler::default();
        let calls = compiler.calls.clone();
        let output = driver(ShardConfig::default(), compiler).build(SOURCE, "lit.shard").unwrap();

        assert_eq!(
            *calls.borrow(),
            vec![
                ("vsMain".to_string(), ShaderStage::Vertex, "vs_6_0".to_string()),
                ("psMain".to_string(), ShaderStage::Pixel, "ps_6_0".to_string()),
            ]
        );

        let program = output.program("Lit").unwrap();
        assert_eq!(program.code_block, "Body");
        let legacy = output.spliced_for("Body", Strategy::Legacy).unwrap();
        assert_eq!(program.vertex.blob, legacy.text.as_bytes());
        assert_eq!(program.pixel.reflection.textures.len(), 1);
    }

    #[test]
    fn test_build_splices_every_configured_strategy() {
        let output = driver(ShardConfig::default(), FakeCompiler::default())
            .build(SOURCE, "lit.shard")
            .unwrap();
        assert_eq!(output.spliced.len(), 2);
        assert!(output.spliced_for("Body", Strategy::Bindless).is_some());
    }

    #[test]
    fn test_cross_compile_dialects() {
        let mut config = ShardConfig::default();
        config.build.dialects = vec![TargetDialect::Glsl];
        let output = driver(config, FakeCompiler::default()).build(SOURCE, "lit.shard").unwrap();

        let vertex = &output.program("Lit").unwrap().vertex;
        assert_eq!(
            vertex.cross_compiled.get(&TargetDialect::Glsl).map(String::as_str),
            Some("// glsl")
        );
    }

    #[test]
    fn test_compile_error_aborts_build() {
        let compiler = FakeCompiler {
            fail_on: Some("psMain".to_string()),
            ..Default::default()
        };
        let err = driver(ShardConfig::default(), compiler).build(SOURCE, "lit.shard").unwrap_err();
        match err {
            ShardError::CompileError { entry_point, message } => {
                assert_eq!(entry_point, "psMain");
                assert!(message.contains("X3004"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_cross_compile_error_names_dialect() {
        let mut config = ShardConfig::default();
        config.build.dialects = vec![TargetDialect::Glsl, TargetDialect::Msl];
        let err = driver(config, FakeCompiler::default()).build(SOURCE, "lit.shard").unwrap_err();
        assert!(matches!(
            err,
            ShardError::CrossCompileError { ref dialect, .. } if dialect == "msl"
        ));
    }

    #[test]
    fn test_parse_errors_stop_before_compiling() {
        let compiler = FakeCompiler::default();
        let calls = compiler.calls.clone();
        let source = format!("{}[[rx::resGroup1()]] float3x3 m();\n", SOURCE);
        let err = driver(ShardConfig::default(), compiler).build(&source, "lit.shard").unwrap_err();

        assert!(matches!(err, ShardError::ValidationError { .. }));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_build_file_missing() {
        let err = driver(ShardConfig::default(), FakeCompiler::default())
            .build_file(Path::new("does/not/exist.shard"))
            .unwrap_err();
        assert!(matches!(err, ShardError::IoError(_)));
    }
}
