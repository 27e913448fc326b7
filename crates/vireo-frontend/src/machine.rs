use vireo_display::DamageRect;

/// Contract the emulated CPU/memory core exposes to the frontend.
///
/// The core owns the packed framebuffer, the optional 16-color palette, and
/// the damage bookkeeping; the frontend owns pacing and all host-facing
/// conversion. Reading `damage` does not clear it: it reflects total change
/// since the last `run`, so several sinks can query it within one tick and
/// observe the same rectangle.
pub trait Core {
    /// Advances the emulated wall clock to `now_ms` milliseconds since
    /// startup.
    fn advance_clock(&mut self, now_ms: u32);

    /// Executes up to `instruction_budget` instructions.
    fn run(&mut self, instruction_budget: u32);

    /// Packed framebuffer words, row-major, bottom-up, LSB-first.
    fn framebuffer(&self) -> &[u32];

    /// 16-color palette in color mode, `None` in monochrome mode. The mode
    /// is fixed for the lifetime of the core.
    fn palette(&self) -> Option<&[u32; 16]>;

    /// Smallest rectangle covering all framebuffer change since the last
    /// `run`.
    fn damage(&self) -> DamageRect;

    /// Re-runs power-on initialization.
    fn reset(&mut self);

    /// Feeds keyboard-controller protocol bytes to the guest. An empty
    /// slice is a no-op.
    fn inject_key_bytes(&mut self, bytes: &[u8]);

    /// Absolute pointer position in framebuffer coordinates (origin
    /// bottom-left, matching the framebuffer's row order).
    fn inject_mouse_move(&mut self, x: u32, y: u32);

    /// Pointer button edge; buttons are numbered 1..=3.
    fn inject_mouse_button(&mut self, button: u8, down: bool);
}
