use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};

use gallery::{ItemRegistry, TextureData};
use motion::{Ease, Timeline, Tween};
use transitions::Transition;

/// Damping constant applied to the plane's distance from the pointer target;
/// the resulting lag vector drives the vertex deformation.
pub const FOLLOW_STRENGTH: f32 = 0.25;

const FADE_DURATION: Duration = Duration::from_millis(500);
const MOVE_DURATION: Duration = Duration::from_secs(1);
const DECEL_EASE: Ease = Ease::QuintOut;

/// Animation channels owned by the state machine. Each carries at most one
/// tween; starting a new one on the same channel supersedes the old one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Channel {
    Alpha,
    Mix,
    PlaneX,
    PlaneY,
}

/// The shared state surface between the state machine and the shaders.
/// Mutated only through [`HoverEffect`]'s methods; the render layer reads it
/// once per frame.
#[derive(Default)]
pub struct UniformSet {
    pub time: f32,
    pub mix_value: f32,
    pub alpha: f32,
    pub offset: Vec2,
    pub current_texture: Option<Arc<TextureData>>,
    pub previous_texture: Option<Arc<TextureData>>,
}

/// The hover effect lifecycle: item-texture binding, pointer tracking, and
/// the opacity/mix animation sequencing every transition variant shares.
///
/// The machine starts uninitialized and every handler no-ops until
/// [`initialize`](Self::initialize) succeeds and [`mark_loaded`](Self::mark_loaded)
/// reports that preloading finished. Asset races are absorbed silently: a
/// hover over an item whose texture has not resolved leaves the displayed
/// image in place.
pub struct HoverEffect {
    transition: Transition,
    viewport: crate::Viewport,
    registry: Option<ItemRegistry>,
    uniforms: UniformSet,
    plane: crate::PlaneState,
    timeline: Timeline<Channel>,
    current: Option<usize>,
    hovering: bool,
    loaded: bool,
    started: Option<Instant>,
}

impl HoverEffect {
    /// Builds the bare machine. It stays inert until [`initialize`](Self::initialize).
    pub fn new(transition: Transition) -> Self {
        Self {
            transition,
            viewport: crate::Viewport::new(0.0, 0.0),
            registry: None,
            uniforms: UniformSet::default(),
            plane: crate::PlaneState::default(),
            timeline: Timeline::new(),
            current: None,
            hovering: false,
            loaded: false,
            started: None,
        }
    }

    /// Attaches the machine to a viewport and item collection. A degenerate
    /// viewport or an empty registry aborts silently and leaves every
    /// handler a no-op.
    pub fn initialize(&mut self, viewport: crate::Viewport, registry: ItemRegistry) {
        if viewport.is_degenerate() {
            tracing::debug!(
                width = viewport.width,
                height = viewport.height,
                "hover effect not initialized: degenerate viewport"
            );
            return;
        }
        if registry.is_empty() {
            tracing::debug!("hover effect not initialized: empty item registry");
            return;
        }
        self.viewport = viewport;
        self.registry = Some(registry);
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.is_some()
    }

    /// Flips the "assets ready" gate; called once the preloader completes.
    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    pub fn set_viewport(&mut self, viewport: crate::Viewport) {
        if !viewport.is_degenerate() {
            self.viewport = viewport;
        }
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    pub fn plane(&self) -> &crate::PlaneState {
        &self.plane
    }

    pub fn viewport(&self) -> crate::Viewport {
        self.viewport
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Pointer entered the item area: raise the plane's opacity unless it is
    /// already showing. Idempotent while hovering the same item.
    pub fn pointer_enter(&mut self, now: Instant) {
        if !self.is_initialized() {
            return;
        }
        if self.current.is_none() || !self.hovering {
            self.hovering = true;
            self.timeline.start(
                Channel::Alpha,
                Tween::new(self.uniforms.alpha, 1.0, FADE_DURATION, DECEL_EASE, now),
            );
        }
    }

    /// Pointer left the item area: fade the plane out. The later of an
    /// enter/leave pair always wins the alpha channel.
    pub fn pointer_leave(&mut self, now: Instant) {
        if !self.is_initialized() {
            return;
        }
        self.hovering = false;
        self.timeline.start(
            Channel::Alpha,
            Tween::new(self.uniforms.alpha, 0.0, FADE_DURATION, DECEL_EASE, now),
        );
    }

    /// Pointer moved: retarget the plane's position toward the world point
    /// under the cursor. The follow-lag offset is recomputed on every tick
    /// while the position tweens run.
    pub fn pointer_move(&mut self, nx: f32, ny: f32, now: Instant) {
        if !self.is_initialized() {
            return;
        }
        let target = self.viewport.world_target(nx, ny);
        self.plane.target = target;
        self.timeline.start(
            Channel::PlaneX,
            Tween::new(self.plane.position.x, target.x, MOVE_DURATION, DECEL_EASE, now),
        );
        self.timeline.start(
            Channel::PlaneY,
            Tween::new(self.plane.position.y, target.y, MOVE_DURATION, DECEL_EASE, now),
        );
    }

    /// Pointer is over item `index`: trigger the enter fade and, when the
    /// item differs from the current one, swap textures and restart the mix.
    /// No-op until assets finish preloading.
    pub fn pointer_over(&mut self, index: usize, now: Instant) {
        if !self.is_initialized() {
            return;
        }
        if !self.loaded {
            tracing::trace!(item = index, "hover ignored: assets not loaded yet");
            return;
        }

        self.pointer_enter(now);

        // Re-hovering the current item must not restart the mix.
        if self.current == Some(index) {
            return;
        }

        self.retarget(index, now);
    }

    /// Swaps the bound texture to item `index` and restarts the variant's
    /// mix animation. An unresolved texture abandons the swap silently: the
    /// current-item index moves, but every uniform stays as it was.
    fn retarget(&mut self, index: usize, now: Instant) {
        // A superseded transition must stop writing mixValue before the
        // restart, otherwise two tweens race on the same uniform.
        self.timeline.cancel(Channel::Mix);
        self.current = Some(index);

        let registry = self.registry.as_ref().expect("initialized");
        let Some(texture) = registry.texture(index) else {
            tracing::debug!(item = index, "retarget abandoned: texture not resolved");
            return;
        };

        self.plane.scale = Vec3::new(texture.aspect_ratio(), 1.0, 1.0);
        let previous = std::mem::replace(&mut self.uniforms.current_texture, Some(texture));
        if self.transition.uses_previous_texture() {
            self.uniforms.previous_texture = previous;
        }

        if let Some(profile) = self.transition.mix() {
            self.uniforms.mix_value = 0.0;
            self.timeline.start(
                Channel::Mix,
                Tween::new(0.0, 1.0, profile.duration, profile.ease, now),
            );
        }
    }

    /// Advances every running tween to `now`, funnels the sampled values
    /// into the uniform set and plane transform, and recomputes the
    /// follow-lag offset. Called once per frame by the host.
    pub fn tick(&mut self, now: Instant) {
        if !self.is_initialized() {
            return;
        }
        let started = *self.started.get_or_insert(now);
        self.uniforms.time = now.duration_since(started).as_secs_f32();

        for step in self.timeline.advance(now) {
            match step.key {
                Channel::Alpha => self.uniforms.alpha = step.value,
                Channel::Mix => self.uniforms.mix_value = step.value,
                Channel::PlaneX => self.plane.position.x = step.value,
                Channel::PlaneY => self.plane.position.y = step.value,
            }
        }

        let lag = (self.plane.position - self.plane.target) * -FOLLOW_STRENGTH;
        self.uniforms.offset = Vec2::new(lag.x, lag.y);
    }

    #[cfg(test)]
    fn alpha_target(&self) -> Option<f32> {
        self.timeline.target(Channel::Alpha)
    }

    #[cfg(test)]
    fn mix_animating(&self) -> bool {
        self.timeline.is_animating(Channel::Mix)
    }
}
