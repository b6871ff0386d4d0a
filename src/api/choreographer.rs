use indexmap::IndexMap;
use tracing::debug;

use crate::core::types::{
    ElementBounds, IdAllocator, LoopId, RegionId, ScrollSample, SubscriptionId, TargetId, Viewport,
};
use crate::error::ChoreoResult;
use crate::extensions::{ChoreoEvent, ChoreoObserver};
use crate::interaction::SeamlessLoop;
use crate::render::{StyleWriter, TargetRegistry};
use crate::scroll::{ReadinessLedger, ScrollSource};

use super::ChoreographerConfig;
use super::LoopSpec;
use super::region::RegionEntry;

/// Explicit context object for one page.
///
/// Owns the scroll source, measured targets, animated regions, loops and
/// readiness state. Hosts create one per page shell and drive it with
/// `on_scroll`, layout updates and one `tick_frame` per display frame.
pub struct Choreographer<W: StyleWriter> {
    pub(super) writer: W,
    pub(super) config: ChoreographerConfig,
    pub(super) source: ScrollSource,
    pub(super) targets: TargetRegistry,
    pub(super) regions: IndexMap<RegionId, RegionEntry>,
    pub(super) loops: IndexMap<LoopId, LoopSpec>,
    pub(super) ledger: ReadinessLedger,
    pub(super) observers: Vec<Box<dyn ChoreoObserver>>,
    pub(super) layout_generation: u64,
    pub(super) transition_in_flight: bool,
    pub(super) frame_index: u64,
    pub(super) region_alloc: IdAllocator,
    pub(super) loop_alloc: IdAllocator,
}

impl<W: StyleWriter> Choreographer<W> {
    pub fn new(writer: W, config: ChoreographerConfig) -> ChoreoResult<Self> {
        config.validate()?;
        let source = ScrollSource::new(config.scroll_mode)?;
        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            "choreographer created"
        );
        Ok(Self {
            writer,
            config,
            source,
            targets: TargetRegistry::new(),
            regions: IndexMap::new(),
            loops: IndexMap::new(),
            ledger: ReadinessLedger::new(),
            observers: Vec::new(),
            layout_generation: 0,
            transition_in_flight: false,
            frame_index: 0,
            region_alloc: IdAllocator::default(),
            loop_alloc: IdAllocator::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChoreographerConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    #[must_use]
    pub fn scroll_source(&self) -> &ScrollSource {
        &self.source
    }

    #[must_use]
    pub fn current_offset(&self) -> f64 {
        self.source.current_offset()
    }

    #[must_use]
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[must_use]
    pub fn readiness(&self) -> &ReadinessLedger {
        &self.ledger
    }

    #[must_use]
    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    /// Records a native scroll event. Work happens on the next `tick_frame`.
    pub fn on_scroll(&mut self, offset: f64, timestamp_ms: f64) -> ChoreoResult<()> {
        self.source.push_scroll_event(offset, timestamp_ms)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ScrollSample) + 'static) -> SubscriptionId {
        self.source.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> ChoreoResult<()> {
        self.source.unsubscribe(id)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChoreoResult<()> {
        viewport.validate()?;
        if viewport == self.config.viewport {
            return Ok(());
        }
        self.config.viewport = viewport;
        self.invalidate_layout();
        Ok(())
    }

    /// Inserts or updates a target's geometry. Any change invalidates layout.
    pub fn set_target_bounds(&mut self, target: TargetId, bounds: ElementBounds) -> ChoreoResult<()> {
        if self.targets.set(target, bounds)? {
            self.invalidate_layout();
        }
        Ok(())
    }

    /// Forgets a target. Regions and loop items bound to it stop writing.
    pub fn remove_target(&mut self, target: TargetId) -> ChoreoResult<()> {
        self.targets.remove(target)?;
        self.invalidate_layout();
        Ok(())
    }

    /// Marks every trigger region stale. They are remeasured on the next frame.
    pub fn invalidate_layout(&mut self) {
        self.layout_generation += 1;
        self.source.request_refresh();
        debug!(generation = self.layout_generation, "layout invalidated");
        self.emit(ChoreoEvent::LayoutInvalidated {
            generation: self.layout_generation,
        });
    }

    /// Builds a loop carrying this choreographer's inertia and settle tuning.
    pub fn new_loop(&self, widths: Vec<f64>, gap: f64) -> ChoreoResult<SeamlessLoop> {
        SeamlessLoop::new(widths, gap)?
            .with_inertia(self.config.inertia)?
            .with_settle(self.config.loop_settle)
    }
}
