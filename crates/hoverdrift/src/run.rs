use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::Receiver;
use tracing_subscriber::EnvFilter;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use effect::{gpu::PlaneSurface, HoverEffect, Viewport};
use gallery::{
    spawn_preloader, GalleryManifest, ItemRegistry, PreloadEvent, PreloadRequest,
};
use transitions::Transition;

use crate::cli::Cli;
use crate::strips::HoverStrips;

pub fn initialise_tracing(override_filter: Option<&str>) {
    let filter = match override_filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let manifest = GalleryManifest::load(&cli.manifest)
        .with_context(|| format!("failed to load gallery manifest {}", cli.manifest.display()))?;
    let base = cli.manifest.parent().unwrap_or_else(|| Path::new("."));

    let transition = effective_transition(cli.transition, &manifest);
    let (width, height) = cli
        .size
        .unwrap_or((manifest.window.width, manifest.window.height));

    let registry = ItemRegistry::from_manifest(&manifest);
    let requests: Vec<PreloadRequest> = manifest
        .items
        .iter()
        .enumerate()
        .map(|(index, entry)| PreloadRequest {
            index,
            path: entry.resolved_image(base),
        })
        .collect();
    let preload = spawn_preloader(requests);

    tracing::info!(%transition, items = registry.len(), "starting hoverdrift");

    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window = WindowBuilder::new()
        .with_title(&manifest.window.title)
        .with_inner_size(LogicalSize::new(width, height))
        .build(&event_loop)
        .context("failed to create gallery window")?;
    let window = Arc::new(window);

    let size = window.inner_size();
    let mut effect = HoverEffect::new(transition);
    effect.initialize(
        Viewport::new(size.width as f32, size.height as f32),
        registry.clone(),
    );
    let mut surface = PlaneSurface::new(
        window.as_ref(),
        size.width,
        size.height,
        transition,
        manifest.window.plane_height,
    )?;
    let mut strips = HoverStrips::new(registry.len(), size.width as f32, size.height as f32);

    window.request_redraw();
    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            let now = Instant::now();
                            if let Some(index) = strips.index_at(position.y as f32) {
                                effect.pointer_over(index, now);
                            }
                            let (nx, ny) =
                                strips.normalized(position.x as f32, position.y as f32);
                            effect.pointer_move(nx, ny, now);
                        }
                        WindowEvent::CursorLeft { .. } => {
                            effect.pointer_leave(Instant::now());
                        }
                        WindowEvent::Resized(new_size) => {
                            surface.resize(new_size.width, new_size.height);
                            effect.set_viewport(Viewport::new(
                                new_size.width as f32,
                                new_size.height as f32,
                            ));
                            strips.resize(new_size.width as f32, new_size.height as f32);
                        }
                        WindowEvent::RedrawRequested => {
                            drain_preloader(&preload, &registry, &mut effect);
                            effect.tick(Instant::now());
                            match surface.render(&effect) {
                                Ok(()) => {}
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                    let size = window.inner_size();
                                    surface.resize(size.width, size.height);
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    tracing::error!("surface out of memory; exiting");
                                    elwt.exit();
                                }
                                Err(other) => {
                                    tracing::warn!(error = ?other, "surface error; retrying next frame");
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    window.request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}

fn effective_transition(cli_override: Option<Transition>, manifest: &GalleryManifest) -> Transition {
    cli_override.unwrap_or(manifest.transition)
}

/// Attaches decoded textures to the registry and flips the effect's loaded
/// gate once the preloader reports completion.
fn drain_preloader(
    events: &Receiver<PreloadEvent>,
    registry: &ItemRegistry,
    effect: &mut HoverEffect,
) {
    while let Ok(event) = events.try_recv() {
        match event {
            PreloadEvent::Loaded { index, texture } => {
                registry.attach_texture(index, texture);
            }
            // Already logged by the loader; the item simply stays textureless.
            PreloadEvent::Failed { .. } => {}
            PreloadEvent::Complete => {
                tracing::info!(
                    loaded = registry.loaded_count(),
                    total = registry.len(),
                    "gallery preload complete"
                );
                effect.mark_loaded();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
        transition = "smooth-fade"

        [[items]]
        label = "one"
        image = "one.png"

        [[items]]
        label = "two"
        image = "sub/two.png"
    "#;

    #[test]
    fn cli_transition_overrides_the_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gallery.toml");
        std::fs::write(&path, MANIFEST).expect("manifest writes");
        let manifest = GalleryManifest::load(&path).expect("manifest loads");

        assert_eq!(
            effective_transition(None, &manifest),
            Transition::SmoothFade
        );
        assert_eq!(
            effective_transition(Some(Transition::Perlin), &manifest),
            Transition::Perlin
        );
    }

    #[test]
    fn preload_requests_resolve_against_the_manifest_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gallery.toml");
        std::fs::write(&path, MANIFEST).expect("manifest writes");
        let manifest = GalleryManifest::load(&path).expect("manifest loads");
        let base = path.parent().expect("manifest has a parent");

        let resolved: Vec<_> = manifest
            .items
            .iter()
            .map(|entry| entry.resolved_image(base))
            .collect();
        assert_eq!(resolved[0], dir.path().join("one.png"));
        assert_eq!(resolved[1], dir.path().join("sub/two.png"));
    }

    #[test]
    fn completion_event_flips_the_loaded_gate() {
        let registry = ItemRegistry::new(["a"].map(String::from));
        let mut effect = HoverEffect::new(Transition::Perlin);
        effect.initialize(Viewport::new(800.0, 600.0), registry.clone());

        let (sender, receiver) = crossbeam_channel::unbounded();
        sender
            .send(PreloadEvent::Loaded {
                index: 0,
                texture: Arc::new(gallery::TextureData::solid(2, 2, [9, 9, 9, 255])),
            })
            .unwrap();
        sender.send(PreloadEvent::Complete).unwrap();

        drain_preloader(&receiver, &registry, &mut effect);
        assert_eq!(registry.loaded_count(), 1);
        // A hover now binds the texture, proving the gate opened.
        effect.pointer_over(0, Instant::now());
        assert!(effect.uniforms().current_texture.is_some());
    }
}
