use anyhow::Context;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use shortgpu::core::{App, AppControl, FrameCtx};
use shortgpu::device::Gpu;
use shortgpu::logging::{init_logging, LoggingConfig};
use shortgpu::render::TEXTURED_SHADER;
use shortgpu::window::{Runtime, RuntimeConfig};
use shortgpu::{
    primitives, Camera, CullMode, ObjectId, ObjectOptions, PipelineId, PipelineOptions, Renderer,
    ShaderStage, TextureDesc, UniformDescription, UniformType, UpdateData, WgpuDevice,
};

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.04,
    a: 1.0,
};

const TINT_SHADER: &str = include_str!("shaders/tint.wgsl");

/// Degrees per second.
const SPIN_SPEED: f32 = 45.0;
const ORBIT_RADIUS: f32 = 6.0;

const CHECKER_SIZE: u32 = 64;
const CHECKER_CELL: u32 = 8;

/// RGBA8 checkerboard of `CHECKER_CELL`-pixel squares.
fn checkerboard() -> Vec<u8> {
    (0..CHECKER_SIZE * CHECKER_SIZE)
        .flat_map(|i| {
            let (x, y) = (i % CHECKER_SIZE, i / CHECKER_SIZE);
            let light = (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0;
            if light { [200, 200, 210, 255] } else { [60, 60, 70, 255] }
        })
        .collect()
}

struct Scene {
    renderer: Renderer<WgpuDevice>,
    lit: PipelineId,
    floor_pipeline: PipelineId,
    tinted: PipelineId,
    cube: ObjectId,
    floor: ObjectId,
    sphere: ObjectId,
}

impl Scene {
    fn new(gpu: &Gpu<'_>) -> shortgpu::Result<Self> {
        let mut renderer =
            Renderer::new(WgpuDevice::from_gpu(gpu)).with_aspect_ratio(gpu.aspect_ratio());

        let lit = renderer.create_pipeline(&PipelineOptions::default().with_label("lit"), 8)?;

        let pixels = checkerboard();
        let checker = renderer.create_texture(&TextureDesc {
            label: "checker",
            width: CHECKER_SIZE,
            height: CHECKER_SIZE,
            pixels: &pixels,
        })?;
        let floor_pipeline = renderer.create_pipeline(
            &PipelineOptions::default()
                .with_label("floor")
                .with_shader(TEXTURED_SHADER)
                .with_cull_mode(CullMode::None)
                .with_texture(checker),
            1,
        )?;
        let tinted = renderer.create_pipeline(
            &PipelineOptions::default()
                .with_label("tinted")
                .with_shader(TINT_SHADER)
                .with_entry_points("vs_tint", "fs_tint")
                .with_uniform(
                    UniformDescription::new(1, UniformType::Vec4f)
                        .with_visibility(ShaderStage::Fragment),
                ),
            8,
        )?;

        let cube = renderer.add_object(lit, &primitives::cube(), &ObjectOptions::default())?;
        let floor =
            renderer.add_object(floor_pipeline, &primitives::plane(8), &ObjectOptions::default())?;
        let sphere = renderer.add_object(
            tinted,
            &primitives::sphere(32, 16),
            &ObjectOptions::default().with_label("sphere"),
        )?;

        renderer.update(
            &UpdateData::new(floor_pipeline, floor)
                .with_translate([0.0, -1.0, 0.0])
                .with_scale([8.0, 1.0, 8.0]),
        )?;
        renderer.update(
            &UpdateData::new(tinted, sphere)
                .with_translate([1.75, 0.0, 0.0])
                .with_scale([1.5, 1.5, 1.5]),
        )?;
        renderer.update(&UpdateData::new(lit, cube).with_translate([-1.25, 0.0, 0.0]))?;

        Ok(Self {
            renderer,
            lit,
            floor_pipeline,
            tinted,
            cube,
            floor,
            sphere,
        })
    }

    /// Spins the cube, cycles the sphere tint and orbits the camera.
    fn animate(&mut self, t: f32) -> shortgpu::Result<()> {
        let angle = t * 0.3;
        let camera = Camera::default()
            .with_position([angle.sin() * ORBIT_RADIUS, 3.0, angle.cos() * ORBIT_RADIUS])
            .looking_at([0.0, 0.0, 0.0]);

        self.renderer.update(
            &UpdateData::new(self.lit, self.cube)
                .with_rotation([1.0, 1.0, 0.0], t * SPIN_SPEED)
                .with_camera(camera),
        )?;
        self.renderer
            .update(&UpdateData::new(self.floor_pipeline, self.floor).with_camera(camera))?;

        let tint = [
            0.5 + 0.5 * t.sin(),
            0.5 + 0.5 * (t + 2.1).sin(),
            0.5 + 0.5 * (t + 4.2).sin(),
            1.0,
        ];
        self.renderer.update(
            &UpdateData::new(self.tinted, self.sphere)
                .with_camera(camera)
                .with_uniform_data(vec![tint.into()]),
        )
    }
}

#[derive(Default)]
struct Demo {
    scene: Option<Scene>,
}

impl App for Demo {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> anyhow::Result<()> {
        let scene = Scene::new(gpu).context("failed to build demo scene")?;
        log::info!(
            "scene ready: {} pipelines",
            scene.renderer.registry().pipeline_count()
        );
        self.scene = Some(scene);
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            WindowEvent::Resized(size) => {
                if let Some(scene) = self.scene.as_mut() {
                    scene.renderer.resize(size.width, size.height);
                }
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Continue;
        };

        if let Err(e) = scene.animate(ctx.time.elapsed) {
            log::error!("scene update failed: {e}");
            return AppControl::Exit;
        }

        let frame_index = ctx.time.frame_index;
        let dt = ctx.time.dt;
        ctx.render(CLEAR, |pass| {
            let stats = scene.renderer.render_frame(pass);
            if frame_index % 600 == 0 {
                log::info!(
                    "frame {frame_index}: {} draws, {:.1} fps",
                    stats.draw_calls,
                    1.0 / dt
                );
            }
        })
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(RuntimeConfig::default().with_title("shortgpu demo"), Demo::default())
}
