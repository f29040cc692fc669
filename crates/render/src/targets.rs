use crate::plan::RenderTarget;
use fountain_common::{DepthAttachment, SamplerSpec, Viewport};

/// Size and attachments of one offscreen color target.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDescriptor {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub depth: DepthAttachment,
    pub sampler: SamplerSpec,
}

impl TargetDescriptor {
    pub fn for_target(target: RenderTarget, viewport: Viewport, depth: DepthAttachment) -> Self {
        Self {
            label: target.label(),
            width: viewport.width.max(1),
            height: viewport.height.max(1),
            depth,
            sampler: SamplerSpec::LINEAR_CLAMP,
        }
    }
}

/// Completeness check result reported by the backend after allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    Complete,
    Incomplete(String),
}

/// Allocates offscreen targets on a concrete backend.
///
/// Allocation always yields a handle, even when the backend reports the
/// target as incomplete. Rendering into an incomplete target is allowed
/// and simply produces unspecified contents.
pub trait TargetAllocator {
    type Target;

    fn allocate(&mut self, desc: &TargetDescriptor) -> (Self::Target, TargetStatus);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDiagnostic {
    pub target: RenderTarget,
    pub reason: String,
}

/// The reflection and refraction targets, created once at startup.
#[derive(Debug)]
pub struct OffscreenTargets<T> {
    pub reflection: T,
    pub refraction: T,
    pub diagnostics: Vec<TargetDiagnostic>,
}

impl<T> OffscreenTargets<T> {
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn get(&self, target: RenderTarget) -> Option<&T> {
        match target {
            RenderTarget::Reflection => Some(&self.reflection),
            RenderTarget::Refraction => Some(&self.refraction),
            RenderTarget::Screen => None,
        }
    }
}

/// Create both offscreen targets at the viewport size.
///
/// An incomplete target is logged once and recorded in `diagnostics`;
/// it is still returned and used.
pub fn setup_offscreen_targets<A: TargetAllocator>(
    allocator: &mut A,
    viewport: Viewport,
    depth: DepthAttachment,
) -> OffscreenTargets<A::Target> {
    let mut diagnostics = Vec::new();
    let mut make = |target: RenderTarget| {
        let desc = TargetDescriptor::for_target(target, viewport, depth);
        let (handle, status) = allocator.allocate(&desc);
        match status {
            TargetStatus::Complete => {
                tracing::debug!(
                    target = desc.label,
                    width = desc.width,
                    height = desc.height,
                    "offscreen target ready"
                );
            }
            TargetStatus::Incomplete(reason) => {
                tracing::error!(target = desc.label, "framebuffer is not complete: {reason}");
                diagnostics.push(TargetDiagnostic { target, reason });
            }
        }
        handle
    };

    let reflection = make(RenderTarget::Reflection);
    let refraction = make(RenderTarget::Refraction);
    OffscreenTargets {
        reflection,
        refraction,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeAllocator {
        fail: Vec<&'static str>,
        seen: Vec<TargetDescriptor>,
    }

    impl TargetAllocator for FakeAllocator {
        type Target = usize;

        fn allocate(&mut self, desc: &TargetDescriptor) -> (usize, TargetStatus) {
            self.seen.push(desc.clone());
            let status = if self.fail.contains(&desc.label) {
                TargetStatus::Incomplete("missing attachment".into())
            } else {
                TargetStatus::Complete
            };
            (self.seen.len() - 1, status)
        }
    }

    #[test]
    fn both_targets_at_viewport_size() {
        let mut alloc = FakeAllocator::default();
        let targets =
            setup_offscreen_targets(&mut alloc, Viewport::new(800, 600), DepthAttachment::Depth);

        assert!(targets.is_complete());
        assert_eq!(targets.reflection, 0);
        assert_eq!(targets.refraction, 1);
        assert_eq!(alloc.seen.len(), 2);
        for desc in &alloc.seen {
            assert_eq!((desc.width, desc.height), (800, 600));
            assert_eq!(desc.depth, DepthAttachment::Depth);
            assert_eq!(desc.sampler, SamplerSpec::LINEAR_CLAMP);
        }
        assert_eq!(alloc.seen[0].label, "reflection");
        assert_eq!(alloc.seen[1].label, "refraction");
    }

    #[test]
    fn incomplete_target_is_reported_but_kept() {
        let mut alloc = FakeAllocator {
            fail: vec!["refraction"],
            ..Default::default()
        };
        let targets =
            setup_offscreen_targets(&mut alloc, Viewport::DEFAULT, DepthAttachment::DepthStencil);

        assert!(!targets.is_complete());
        assert_eq!(
            targets.diagnostics,
            vec![TargetDiagnostic {
                target: RenderTarget::Refraction,
                reason: "missing attachment".into(),
            }]
        );
        assert_eq!(targets.get(RenderTarget::Refraction), Some(&1));
        assert_eq!(targets.get(RenderTarget::Screen), None);
    }

    #[test]
    fn each_failed_target_gets_one_diagnostic() {
        let mut alloc = FakeAllocator {
            fail: vec!["refraction", "reflection"],
            ..Default::default()
        };
        let targets =
            setup_offscreen_targets(&mut alloc, Viewport::DEFAULT, DepthAttachment::Depth);

        assert_eq!(alloc.seen.len(), 2);
        let failed: Vec<RenderTarget> = targets.diagnostics.iter().map(|d| d.target).collect();
        assert_eq!(failed, vec![RenderTarget::Reflection, RenderTarget::Refraction]);
        assert!(targets.get(RenderTarget::Reflection).is_some());
        assert!(targets.get(RenderTarget::Refraction).is_some());
    }

    #[test]
    fn zero_viewport_is_clamped() {
        let desc = TargetDescriptor::for_target(
            RenderTarget::Reflection,
            Viewport::new(0, 0),
            DepthAttachment::Depth,
        );
        assert_eq!((desc.width, desc.height), (1, 1));
    }
}
