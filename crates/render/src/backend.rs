use crate::plan::{DepthCompare, DrawCall, DrawKind, FramePlan, PassKind, PassPlan, RenderTarget};

/// A graphics backend the sequencer can drive.
///
/// `begin_pass` binds the pass target and clears it; `end_pass` unbinds
/// it. The backend owns every GPU handle it creates.
pub trait RenderBackend {
    type Error;

    /// Acquire whatever the frame needs (e.g. the next swapchain image).
    fn begin_frame(&mut self) -> Result<(), Self::Error>;

    fn begin_pass(&mut self, pass: &PassPlan);

    /// Switch the depth comparison for subsequent draws. Backends that bake
    /// the comparison into pipelines may ignore this.
    fn set_depth_compare(&mut self, _compare: DepthCompare) {}

    fn draw(&mut self, pass: &PassPlan, call: &DrawCall);

    fn end_pass(&mut self, pass: &PassPlan);

    /// Submit and show the finished frame.
    fn present(&mut self);
}

/// Run one frame's passes through `backend`, strictly in plan order.
///
/// Draws that need a non-default depth comparison switch it right before
/// the draw and restore `<` right after.
pub fn execute_frame<B: RenderBackend>(plan: &FramePlan, backend: &mut B) -> Result<(), B::Error> {
    let _span = tracing::debug_span!("frame", passes = plan.passes.len()).entered();
    backend.begin_frame()?;
    for pass in &plan.passes {
        tracing::trace!(pass = pass.kind.label(), target = pass.target.label(), "begin pass");
        backend.begin_pass(pass);
        for call in &pass.draws {
            let compare = call.depth_compare();
            if compare != DepthCompare::Less {
                backend.set_depth_compare(compare);
                backend.draw(pass, call);
                backend.set_depth_compare(DepthCompare::Less);
            } else {
                backend.draw(pass, call);
            }
        }
        backend.end_pass(pass);
    }
    backend.present();
    Ok(())
}

/// Backend call, as seen by [`RecordingBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    BeginFrame,
    Bind(RenderTarget),
    Clear(RenderTarget),
    DepthCompare(DepthCompare),
    Draw(PassKind, DrawKind),
    Unbind(RenderTarget),
    Present,
}

/// Backend that only records the calls it receives. Used to check pass
/// ordering without a GPU.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub events: Vec<BackendEvent>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, event: BackendEvent) -> Option<usize> {
        self.events.iter().position(|e| *e == event)
    }
}

impl RenderBackend for RecordingBackend {
    type Error = std::convert::Infallible;

    fn begin_frame(&mut self) -> Result<(), Self::Error> {
        self.events.push(BackendEvent::BeginFrame);
        Ok(())
    }

    fn begin_pass(&mut self, pass: &PassPlan) {
        self.events.push(BackendEvent::Bind(pass.target));
        self.events.push(BackendEvent::Clear(pass.target));
    }

    fn set_depth_compare(&mut self, compare: DepthCompare) {
        self.events.push(BackendEvent::DepthCompare(compare));
    }

    fn draw(&mut self, pass: &PassPlan, call: &DrawCall) {
        self.events.push(BackendEvent::Draw(pass.kind, call.kind()));
    }

    fn end_pass(&mut self, pass: &PassPlan) {
        self.events.push(BackendEvent::Unbind(pass.target));
    }

    fn present(&mut self) {
        self.events.push(BackendEvent::Present);
    }
}
