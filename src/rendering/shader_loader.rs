use std::{
    path::Path,
    sync::{
        mpsc::{self, channel},
        Arc, RwLock,
    },
    time::Duration,
};

use anyhow::Context;
use id_arena::{Arena, Id};
use naga::{
    back::wgsl::WriterFlags,
    valid::{Capabilities, ValidationFlags},
};
use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
};
use notify_debouncer_mini::{
    new_debouncer_opt, notify::*, DebounceEventResult, DebouncedEventKind, Debouncer,
};
use pollster::block_on;
use wgpu::{naga, PollType, RenderPipeline};

const SHADER_FOLDER: &str = "assets/shaders";
const SHARED_SHADER_MODULES_FOLDER: &str = "assets/shaders/shared";

pub(crate) type PipelineFactory = Box<
    dyn Sync
        + Send
        + Fn(&wgpu::Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>,
>;

#[derive(Debug, Clone)]
pub(crate) struct ShaderDefinition {
    pub name: &'static str,
    pub path: &'static str,
}

pub(crate) struct ShaderEntry {
    pipeline_id: PipelineId,
    def: ShaderDefinition,
    factory: PipelineFactory,
}

pub type PipelineId = Id<PipelineCacheEntry>;

#[derive(Default)]
pub struct PipelineCacheEntry(Option<wgpu::RenderPipeline>);

impl PipelineCacheEntry {
    pub fn set_pipeline(&mut self, pipeline: wgpu::RenderPipeline) {
        self.0 = Some(pipeline);
    }
}

pub struct PipelineCacheBuilder {
    shaders: Arena<ShaderEntry>,
    pipelines: Arena<PipelineCacheEntry>,
}

impl PipelineCacheBuilder {
    pub fn new() -> Self {
        Self {
            shaders: Arena::new(),
            pipelines: Arena::new(),
        }
    }

    pub(crate) fn add_shader(
        &mut self,
        def: ShaderDefinition,
        factory: PipelineFactory,
    ) -> PipelineId {
        let pipeline_id = self.pipelines.alloc(PipelineCacheEntry::default());
        self.shaders.alloc(ShaderEntry {
            pipeline_id,
            def,
            factory,
        });
        pipeline_id
    }

    pub fn build(self) -> PipelineCache {
        PipelineCache {
            shaders: Arc::new(self.shaders),
            pipelines: self.pipelines,
        }
    }
}

pub struct PipelineCache {
    shaders: Arc<Arena<ShaderEntry>>,
    pipelines: Arena<PipelineCacheEntry>,
}

impl PipelineCache {
    pub fn get(&self, id: PipelineId) -> Option<&RenderPipeline> {
        self.pipelines.get(id).and_then(|entry| entry.0.as_ref())
    }

    fn get_entry_mut(&mut self, id: PipelineId) -> Option<&mut PipelineCacheEntry> {
        self.pipelines.get_mut(id)
    }
}

// Compiles every shader up front, then recompiles changed files on the watcher thread and
// hands the new pipelines back over a channel.
pub(crate) struct ShaderLoader {
    pub cache: PipelineCache,
    receiver: mpsc::Receiver<(&'static str, PipelineId, wgpu::RenderPipeline)>,
    _debouncer: Option<Debouncer<RecommendedWatcher>>,
}

impl ShaderLoader {
    pub fn new(
        device: wgpu::Device,
        cache_builder: PipelineCacheBuilder,
        hot_reload: bool,
    ) -> anyhow::Result<Self> {
        let mut cache = cache_builder.build();

        let composer = create_composer().context("Failed to create shader composer")?;
        let composer = Arc::new(RwLock::new(composer));

        for (_, shader) in cache.shaders.clone().iter() {
            let pipeline = compile_file(&device, &shader.def, &shader.factory, &composer)
                .with_context(|| format!("Failed to compile shader: {}", shader.def.name))?;

            if let Some(entry) = cache.get_entry_mut(shader.pipeline_id) {
                entry.set_pipeline(pipeline);
            }
        }

        let (send_new_pipelines, recv_new_pipelines) = channel();

        let debouncer = if hot_reload {
            let shaders = cache.shaders.clone();
            let debouncer = new_debouncer_opt::<_, RecommendedWatcher>(
                notify_debouncer_mini::Config::default().with_timeout(Duration::from_millis(100)),
                move |res: DebounceEventResult| match res {
                    Ok(events) => {
                        for event in events {
                            if event.kind != DebouncedEventKind::Any {
                                continue;
                            }

                            // Shared modules are only read at startup
                            let Some((_, entry)) = shaders
                                .iter()
                                .find(|(_, entry)| event.path.ends_with(entry.def.path))
                            else {
                                continue;
                            };

                            match compile_file(&device, &entry.def, &entry.factory, &composer) {
                                Ok(pipeline) => {
                                    if send_new_pipelines
                                        .send((entry.def.name, entry.pipeline_id, pipeline))
                                        .is_err()
                                    {
                                        return;
                                    }
                                }
                                Err(e) => log::error!("Failed to reload shader: {e:?}"),
                            }
                        }
                    }
                    Err(e) => log::error!("Error debouncing shader changes: {e}"),
                },
            );

            match debouncer.and_then(|mut debouncer| {
                let folder = Path::new(SHADER_FOLDER).canonicalize()?;
                debouncer.watcher().watch(&folder, RecursiveMode::Recursive)?;
                Ok(debouncer)
            }) {
                Ok(debouncer) => {
                    log::info!("Watching {SHADER_FOLDER} for changes");
                    Some(debouncer)
                }
                Err(e) => {
                    log::warn!("Shader hot reload disabled: {e}");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            cache,
            receiver: recv_new_pipelines,
            _debouncer: debouncer,
        })
    }

    pub fn load_pending_shaders(&mut self) {
        while let Ok((name, pipeline_id, pipeline)) = self.receiver.try_recv() {
            if let Some(entry) = self.cache.get_entry_mut(pipeline_id) {
                log::info!("Shader reloaded: {name}");
                entry.set_pipeline(pipeline);
            }
        }
    }
}

fn compile_file(
    device: &wgpu::Device,
    shader_def: &ShaderDefinition,
    factory: &PipelineFactory,
    composer: &RwLock<Composer>,
) -> anyhow::Result<wgpu::RenderPipeline> {
    let path = Path::new(SHADER_FOLDER).join(shader_def.path);
    let shader_code = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read shader file {}", path.display()))?;

    let file_path = path.to_string_lossy().to_string();

    let module = {
        let mut composer = composer
            .write()
            .map_err(|_| anyhow::anyhow!("Shader composer lock poisoned"))?;

        composer
            .make_naga_module(NagaModuleDescriptor {
                file_path: &file_path,
                source: &shader_code,
                ..Default::default()
            })
            .map_err(|e| anyhow::anyhow!("{}", e.emit_to_string(&composer)))
            .context("Failed to create Naga module from shader code")?
    };

    // wgpu validates the module again when the pipeline is created
    let info = naga::valid::Validator::new(ValidationFlags::empty(), Capabilities::all())
        .validate(&module)
        .context("Failed to validate Naga module")?;

    let shader_code = naga::back::wgsl::write_string(&module, &info, WriterFlags::empty())
        .context("Failed to convert Naga module to WGSL string")?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let pipeline = factory(device, shader_def, &shader_code);

    device
        .poll(PollType::Wait)
        .context("Failed to poll device after shader compilation.")?;

    if let Some(error) = block_on(device.pop_error_scope()) {
        return Err(anyhow::anyhow!(
            "Shader compilation failed for {}: {}",
            shader_def.name,
            error
        ));
    };

    pipeline
}

fn create_composer() -> anyhow::Result<Composer> {
    let shared_files = std::fs::read_dir(SHARED_SHADER_MODULES_FOLDER)
        .with_context(|| format!("Failed to read {SHARED_SHADER_MODULES_FOLDER}"))?;
    let mut composer = Composer::default();

    for entry in shared_files {
        let path = entry
            .context("Failed to read entry in shared shader modules directory")?
            .path();

        if !path.is_file() || path.extension().is_none_or(|ext| ext != "wgsl") {
            continue;
        }

        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read shared shader module {}", path.display()))?;

        let file_path = path.to_string_lossy().to_string();

        composer
            .add_composable_module(ComposableModuleDescriptor {
                source: &source,
                file_path: &file_path,
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e.emit_to_string(&composer)))
            .with_context(|| format!("Failed to add shared shader module: {file_path}"))?;
    }

    Ok(composer)
}
