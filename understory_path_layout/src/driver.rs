// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout driver: owns scroll state and drives a [`ViewHost`].

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::config::validate_selection_fraction;
use crate::{
    ConfigError, Easing, Extents, OffsetController, Orientation, PathLayoutConfig,
    PathLayoutError, PathSampler, RecycleWindow, ScaleCurve, ScrollMode, ScrollState,
    SmoothScroll, ViewHost, VisibleSet, distance_to, resolve_recycle, resolve_visible,
    settle_offset,
};

/// How long a host should wait between [`PathLayout::poll_deferred`] calls.
pub const DEFERRED_RETRY_INTERVAL_MS: u64 = 5;

/// Polls after which a deferred item change is applied even if the host is
/// still computing layout.
pub const MAX_DEFERRED_POLLS: u32 = 20;

/// Whether the last layout pass placed anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutState {
    /// No items, or no path: nothing is attached.
    #[default]
    Empty,
    /// Views for the visible set are placed.
    LaidOut,
}

/// Scroll gesture phase reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollPhase {
    /// Nothing is moving.
    #[default]
    Idle,
    /// The user is dragging.
    Dragging,
    /// An inertial scroll is running.
    Settling,
}

/// Outcome of an item-count notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relayout {
    /// The change was applied and a layout pass ran.
    Applied(LayoutState),
    /// The host was busy; retry with [`PathLayout::poll_deferred`].
    Deferred,
}

/// Where one visible item was placed during the last pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemPlacement {
    /// Logical item index.
    pub index: usize,
    /// Center of the item, in path coordinates.
    pub position: Point,
    /// Rotation in degrees.
    pub angle: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Position along the path as a fraction of its length.
    pub fraction: f64,
}

#[derive(Clone, Copy, Debug)]
struct PendingChange {
    item_count: usize,
    polls: u32,
}

/// Lays out a virtualized item strip along a path.
///
/// `S` samples the path; `V` is the host's view handle type. The driver keeps
/// views for visible items attached, parks views that just left the path, and
/// releases parked views once they fall into a recycle range or out of the
/// retention zone around the visible window.
///
/// Scrolling and configuration changes mark the layout dirty; the host calls
/// [`layout`](Self::layout) to run a pass. Scroll deltas and smooth-scroll
/// ticks run a pass themselves.
#[derive(Debug)]
pub struct PathLayout<S, V> {
    config: PathLayoutConfig,
    sampler: Option<S>,
    controller: OffsetController,
    item_count: usize,

    attached: HashMap<usize, V>,
    parked: HashMap<usize, V>,
    visible: VisibleSet,
    placements: Vec<ItemPlacement>,
    state: LayoutState,

    phase: ScrollPhase,
    smooth: Option<SmoothScroll>,
    pending: Option<PendingChange>,
    dirty: bool,
}

impl<S: PathSampler, V> PathLayout<S, V> {
    /// Creates a driver with no path and no items.
    pub fn new(config: PathLayoutConfig) -> Result<Self, PathLayoutError> {
        config.validate()?;
        let mut controller =
            OffsetController::new(ScrollState::new(config.mode, config.orientation));
        controller.set_fling_enabled(config.fling_enabled);
        Ok(Self {
            config,
            sampler: None,
            controller,
            item_count: 0,
            attached: HashMap::new(),
            parked: HashMap::new(),
            visible: VisibleSet::default(),
            placements: Vec::new(),
            state: LayoutState::Empty,
            phase: ScrollPhase::Idle,
            smooth: None,
            pending: None,
            dirty: true,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &PathLayoutConfig {
        &self.config
    }

    /// The configured path sampler, if any.
    #[must_use]
    pub fn sampler(&self) -> Option<&S> {
        self.sampler.as_ref()
    }

    /// Replaces the path, returning the previous one.
    pub fn set_path(&mut self, sampler: S) -> Option<S> {
        self.dirty = true;
        self.sampler.replace(sampler)
    }

    /// The scroll state.
    #[must_use]
    pub fn scroll_state(&self) -> &ScrollState {
        self.controller.state()
    }

    /// The live scroll offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.controller.offset()
    }

    /// Number of logical items.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// State after the last pass.
    #[must_use]
    pub const fn state(&self) -> LayoutState {
        self.state
    }

    /// Last reported scroll phase.
    #[must_use]
    pub const fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Items placed by the last pass, in scan order.
    #[must_use]
    pub fn placements(&self) -> &[ItemPlacement] {
        &self.placements
    }

    /// Visible set of the last pass.
    #[must_use]
    pub fn visible(&self) -> &VisibleSet {
        &self.visible
    }

    /// Returns `true` if something changed since the last pass.
    #[must_use]
    pub const fn needs_layout(&self) -> bool {
        self.dirty
    }

    /// Returns `true` while a smooth scroll is in flight.
    #[must_use]
    pub const fn is_smooth_scrolling(&self) -> bool {
        self.smooth.is_some()
    }

    /// Returns `true` while an item change waits for the host.
    #[must_use]
    pub const fn has_deferred_change(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of views currently held, attached or parked.
    #[must_use]
    pub fn held_views(&self) -> usize {
        self.attached.len() + self.parked.len()
    }

    /// Extents for the current path and item count.
    pub fn extents(&self) -> Result<Extents, PathLayoutError> {
        let sampler = self.sampler.as_ref().ok_or(PathLayoutError::PathNotSet)?;
        Ok(Extents::new(
            self.item_count,
            self.config.spacing,
            sampler.length(),
        ))
    }

    fn resolve(&self, extents: &Extents) -> Result<VisibleSet, PathLayoutError> {
        let sampler = self.sampler.as_ref().ok_or(PathLayoutError::PathNotSet)?;
        Ok(resolve_visible(
            sampler,
            self.controller.offset(),
            extents,
            self.config.mode,
        ))
    }

    // --- configuration ---

    /// Sets the distance between consecutive items.
    pub fn set_spacing(&mut self, spacing: u32) -> Result<(), PathLayoutError> {
        if spacing == 0 {
            return Err(ConfigError::ZeroSpacing.into());
        }
        if spacing != self.config.spacing {
            self.config.spacing = spacing;
            self.dirty = true;
        }
        Ok(())
    }

    /// Sets the scroll mode.
    pub fn set_mode(&mut self, mode: ScrollMode) {
        if mode != self.config.mode {
            self.config.mode = mode;
            self.controller.state_mut().mode = mode;
            self.dirty = true;
        }
    }

    /// Sets the scroll axis, carrying the live offset over.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation != self.config.orientation {
            self.config.orientation = orientation;
            self.controller.state_mut().set_orientation(orientation);
            self.dirty = true;
        }
    }

    /// Sets where on the path selected items come to rest.
    pub fn set_selection_fraction(&mut self, fraction: f64) -> Result<(), PathLayoutError> {
        validate_selection_fraction(fraction)?;
        if fraction != self.config.selection_fraction {
            self.config.selection_fraction = fraction;
            self.dirty = true;
        }
        Ok(())
    }

    /// Sets item scaling from flat `(scale, fraction)` pairs.
    ///
    /// An empty slice removes scaling. Rejected input leaves the current curve in place.
    pub fn set_scale_ratios(&mut self, ratios: &[f64]) -> Result<(), PathLayoutError> {
        let curve = if ratios.is_empty() {
            None
        } else {
            Some(ScaleCurve::from_ratios(ratios)?)
        };
        self.set_scale_curve(curve);
        Ok(())
    }

    /// Sets item scaling from a prepared curve.
    pub fn set_scale_curve(&mut self, curve: Option<ScaleCurve>) {
        self.config.scale = curve;
        self.dirty = true;
    }

    /// Sets how many off-path items are kept before eviction.
    pub fn set_cache_count(&mut self, cache_count: usize) {
        if cache_count != self.config.cache_count {
            self.config.cache_count = cache_count;
            self.dirty = true;
        }
    }

    /// Sets the smooth-scroll duration.
    pub fn set_smooth_scroll_duration(&mut self, duration_ms: u64) {
        self.config.smooth_scroll_duration_ms = duration_ms;
    }

    /// Sets the smooth-scroll timing curve.
    pub fn set_easing(&mut self, easing: Easing) {
        self.config.easing = easing;
    }

    /// Enables or disables inertial scrolling.
    pub fn set_fling_enabled(&mut self, enabled: bool) {
        self.config.fling_enabled = enabled;
        self.controller.set_fling_enabled(enabled);
    }

    /// Keeps items upright instead of following the path tangent.
    pub fn set_item_direction_fixed(&mut self, fixed: bool) {
        if fixed != self.config.item_direction_fixed {
            self.config.item_direction_fixed = fixed;
            self.dirty = true;
        }
    }

    /// Enables or disables auto-select.
    ///
    /// Turning it on while a path is set snaps to the nearest item right away,
    /// as if scrolling had just stopped.
    pub fn set_auto_select(&mut self, enabled: bool, now_ms: u64) -> Result<(), PathLayoutError> {
        if enabled == self.config.auto_select {
            return Ok(());
        }
        self.config.auto_select = enabled;
        if enabled && self.sampler.is_some() {
            self.on_scroll_state_changed(ScrollPhase::Idle, now_ms)?;
        }
        Ok(())
    }

    // --- layout ---

    /// Runs a layout pass.
    ///
    /// Without a path every view is released and [`PathLayoutError::PathNotSet`]
    /// is returned. With no items, or none on the path, every view is released
    /// and the state becomes [`LayoutState::Empty`].
    pub fn layout<H>(&mut self, host: &mut H) -> Result<LayoutState, PathLayoutError>
    where
        H: ViewHost<View = V>,
    {
        if self.sampler.is_none() {
            self.release_all(host);
            return Err(PathLayoutError::PathNotSet);
        }
        if self.item_count == 0 {
            self.release_all(host);
            self.dirty = false;
            tracing::debug!("layout pass with no items");
            return Ok(self.state);
        }

        let extents = self.extents()?;
        self.settle(&extents);
        let visible = self.resolve(&extents)?;

        self.parked.extend(self.attached.drain());
        self.placements.clear();
        for item in visible.items() {
            let mut view = match self.parked.remove(&item.index) {
                Some(view) => view,
                None => host.materialize(item.index),
            };
            let size = host.measure(&view);
            host.place(&mut view, Rect::from_center_size(item.sample.position, size));
            let angle = if self.config.item_direction_fixed {
                0.0
            } else {
                item.sample.angle
            };
            let scale = self
                .config
                .scale
                .as_ref()
                .map_or(1.0, |curve| curve.scale_at(item.fraction));
            host.set_rotation(&mut view, angle);
            host.set_scale_x(&mut view, scale);
            host.set_scale_y(&mut view, scale);
            self.placements.push(ItemPlacement {
                index: item.index,
                position: item.sample.position,
                angle,
                scale,
                fraction: item.fraction,
            });
            if let Some(stale) = self.attached.insert(item.index, view) {
                host.release(stale);
            }
        }

        let released = self.recycle(&visible, &extents, host);
        tracing::debug!(
            offset = self.controller.offset(),
            visible = visible.len(),
            first = visible.first().map(|item| item.index),
            last = visible.last().map(|item| item.index),
            parked = self.parked.len(),
            released,
            "layout pass"
        );
        self.state = if visible.is_empty() {
            LayoutState::Empty
        } else {
            LayoutState::LaidOut
        };
        self.visible = visible;
        self.dirty = false;
        Ok(self.state)
    }

    /// Releases parked views in the recycle ranges or outside the retention zone.
    fn recycle<H>(&mut self, visible: &VisibleSet, extents: &Extents, host: &mut H) -> usize
    where
        H: ViewHost<View = V>,
    {
        let looping = extents.is_looping(self.config.mode);
        let Some(window) =
            RecycleWindow::from_visible(visible, extents, self.config.cache_count, looping)
        else {
            let released = self.parked.len();
            for (_, view) in self.parked.drain() {
                host.release(view);
            }
            return released;
        };

        let mut released = 0;
        let ranges = resolve_recycle(&window);
        for index in ranges.evictions(self.item_count, looping, visible) {
            if let Some(view) = self.parked.remove(&index) {
                host.release(view);
                released += 1;
            }
        }
        let item_count = self.item_count;
        let stragglers: SmallVec<[usize; 16]> = self
            .parked
            .keys()
            .copied()
            .filter(|&index| index >= item_count || !window.retains(index))
            .collect();
        for index in stragglers {
            if let Some(view) = self.parked.remove(&index) {
                host.release(view);
                released += 1;
            }
        }
        if released > 0 {
            tracing::trace!(released, ?ranges, "recycled views");
        }
        released
    }

    fn settle(&mut self, extents: &Extents) {
        let offset = self.controller.offset();
        let settled = settle_offset(offset, self.config.mode, extents);
        if settled != offset {
            tracing::trace!(offset, settled, "offset settled into range");
            self.controller.state_mut().set_offset(settled);
        }
    }

    fn release_all<H>(&mut self, host: &mut H)
    where
        H: ViewHost<View = V>,
    {
        let released = self.attached.len() + self.parked.len();
        for (_, view) in self.attached.drain().chain(self.parked.drain()) {
            host.release(view);
        }
        if released > 0 {
            tracing::debug!(released, "released all views");
        }
        self.placements.clear();
        self.visible = VisibleSet::default();
        self.state = LayoutState::Empty;
    }

    // --- scrolling ---

    /// Applies a host scroll delta and returns the amount consumed.
    ///
    /// Deltas for the inactive axis are ignored.
    pub fn on_scroll_delta<H>(
        &mut self,
        delta: f64,
        orientation: Orientation,
        host: &mut H,
    ) -> Result<f64, PathLayoutError>
    where
        H: ViewHost<View = V>,
    {
        if orientation != self.controller.state().orientation() {
            tracing::trace!(delta, ?orientation, "delta on inactive axis ignored");
            return Ok(0.0);
        }
        let extents = self.extents()?;
        if self.item_count == 0 {
            return Ok(0.0);
        }
        let consumed = self.controller.apply_delta(delta, &extents);
        if consumed != 0.0 || self.dirty {
            self.layout(host)?;
        }
        Ok(consumed)
    }

    /// The visible item nearest the selection point at the current offset.
    pub fn closest_to_selection(&self) -> Result<Option<usize>, PathLayoutError> {
        let extents = self.extents()?;
        let visible = self.resolve(&extents)?;
        Ok(visible
            .closest_to(self.config.selection_fraction)
            .map(|item| item.index))
    }

    fn distance_to(&self, index: usize, extents: &Extents) -> Result<f64, PathLayoutError> {
        let visible = self.resolve(extents)?;
        Ok(distance_to(
            index,
            &visible,
            self.config.selection_fraction,
            self.controller.offset(),
            extents,
            extents.is_looping(self.config.mode),
        ))
    }

    /// Jumps so that `index` rests on the selection point.
    ///
    /// Out-of-range indices are ignored. Cancels any smooth scroll.
    pub fn scroll_to_index<H>(&mut self, index: usize, host: &mut H) -> Result<(), PathLayoutError>
    where
        H: ViewHost<View = V>,
    {
        let extents = self.extents()?;
        if index >= self.item_count {
            tracing::trace!(index, item_count = self.item_count, "scroll target out of range");
            return Ok(());
        }
        self.cancel_smooth_scroll();
        let distance = self.distance_to(index, &extents)?;
        self.controller.apply_delta(distance, &extents);
        self.layout(host)?;
        Ok(())
    }

    /// Starts a smooth scroll that brings `index` to the selection point.
    ///
    /// Returns `false` for an out-of-range index. Any scroll already in flight
    /// is cancelled first. Drive it with [`tick`](Self::tick).
    pub fn smooth_scroll_to(&mut self, index: usize, now_ms: u64) -> Result<bool, PathLayoutError> {
        let extents = self.extents()?;
        if index >= self.item_count {
            tracing::trace!(index, item_count = self.item_count, "scroll target out of range");
            return Ok(false);
        }
        self.cancel_smooth_scroll();
        let distance = self.distance_to(index, &extents)?;
        tracing::debug!(index, distance, "smooth scroll started");
        self.smooth = Some(SmoothScroll::new(
            index,
            distance,
            now_ms,
            self.config.smooth_scroll_duration_ms,
            self.config.easing,
        ));
        Ok(true)
    }

    /// Cancels the smooth scroll in flight, if any.
    pub fn cancel_smooth_scroll(&mut self) -> bool {
        match self.smooth.take() {
            Some(scroll) => {
                tracing::debug!(
                    index = scroll.target(),
                    remaining = scroll.remaining(),
                    "smooth scroll cancelled"
                );
                true
            }
            None => false,
        }
    }

    /// Advances the smooth scroll to `now_ms`.
    ///
    /// Returns `true` while more ticks are needed. On the final tick, with
    /// auto-select on, the host is told which item was selected.
    pub fn tick<H>(&mut self, now_ms: u64, host: &mut H) -> Result<bool, PathLayoutError>
    where
        H: ViewHost<View = V>,
    {
        let Some(scroll) = self.smooth.as_mut() else {
            return Ok(false);
        };
        let step = scroll.tick(now_ms);
        let target = scroll.target();
        if step.finished {
            self.smooth = None;
        }
        if step.delta != 0.0 {
            let extents = self.extents()?;
            self.controller.apply_delta(step.delta, &extents);
            self.layout(host)?;
        }
        if !step.finished {
            return Ok(true);
        }
        tracing::debug!(
            index = target,
            offset = self.controller.offset(),
            "smooth scroll finished"
        );
        if self.config.auto_select {
            host.item_selected(target);
        }
        Ok(false)
    }

    /// Reacts to a scroll phase change.
    ///
    /// Settling marks a fling in progress, dragging cancels any smooth
    /// scroll, and idle snaps to the nearest item when auto-select is on.
    pub fn on_scroll_state_changed(
        &mut self,
        phase: ScrollPhase,
        now_ms: u64,
    ) -> Result<(), PathLayoutError> {
        self.phase = phase;
        self.controller.set_flinging(phase == ScrollPhase::Settling);
        match phase {
            ScrollPhase::Dragging => {
                self.cancel_smooth_scroll();
            }
            ScrollPhase::Idle if self.config.auto_select => {
                if let Some(index) = self.closest_to_selection()? {
                    self.smooth_scroll_to(index, now_ms)?;
                }
            }
            ScrollPhase::Idle | ScrollPhase::Settling => {}
        }
        Ok(())
    }

    // --- structural changes ---

    /// Reports a new item count.
    ///
    /// If the host is computing layout the change is deferred; call
    /// [`poll_deferred`](Self::poll_deferred) every
    /// [`DEFERRED_RETRY_INTERVAL_MS`] until it is applied. Without a path the
    /// count is recorded and the layout stays empty.
    pub fn set_item_count<H>(
        &mut self,
        item_count: usize,
        host: &mut H,
    ) -> Result<Relayout, PathLayoutError>
    where
        H: ViewHost<View = V>,
    {
        if host.is_computing_layout() {
            tracing::debug!(item_count, "host busy; item change deferred");
            self.pending = Some(PendingChange {
                item_count,
                polls: 0,
            });
            return Ok(Relayout::Deferred);
        }
        self.pending = None;
        self.apply_item_count(item_count, host).map(Relayout::Applied)
    }

    /// Reports that items were added, removed or moved without a count change.
    pub fn notify_items_changed<H>(&mut self, host: &mut H) -> Result<Relayout, PathLayoutError>
    where
        H: ViewHost<View = V>,
    {
        let item_count = self.pending.map_or(self.item_count, |p| p.item_count);
        self.set_item_count(item_count, host)
    }

    /// Retries a deferred item change.
    ///
    /// Returns `None` when nothing is pending. After [`MAX_DEFERRED_POLLS`]
    /// the change is applied even if the host is still busy.
    pub fn poll_deferred<H>(&mut self, host: &mut H) -> Result<Option<Relayout>, PathLayoutError>
    where
        H: ViewHost<View = V>,
    {
        let Some(mut pending) = self.pending else {
            return Ok(None);
        };
        if host.is_computing_layout() {
            if pending.polls < MAX_DEFERRED_POLLS {
                pending.polls += 1;
                self.pending = Some(pending);
                tracing::trace!(polls = pending.polls, "item change still deferred");
                return Ok(Some(Relayout::Deferred));
            }
            tracing::warn!(
                polls = pending.polls,
                "host still computing layout; applying item change anyway"
            );
        }
        self.pending = None;
        self.apply_item_count(pending.item_count, host)
            .map(|state| Some(Relayout::Applied(state)))
    }

    fn apply_item_count<H>(
        &mut self,
        item_count: usize,
        host: &mut H,
    ) -> Result<LayoutState, PathLayoutError>
    where
        H: ViewHost<View = V>,
    {
        self.item_count = item_count;
        self.dirty = true;
        if self.sampler.is_none() {
            self.release_all(host);
            return Ok(self.state);
        }
        self.layout(host)
    }

    // --- lifecycle ---

    /// Discards every view and lays out from scratch.
    ///
    /// Call after the host failed mid-dispatch and attached views may be stale.
    pub fn recover_from_host_failure<H>(
        &mut self,
        host: &mut H,
    ) -> Result<LayoutState, PathLayoutError>
    where
        H: ViewHost<View = V>,
    {
        tracing::warn!(
            attached = self.attached.len(),
            parked = self.parked.len(),
            "recovering from host failure"
        );
        self.release_all(host);
        self.dirty = true;
        self.layout(host)
    }

    /// Releases every view, cancels scrolling and drops the path.
    pub fn detach<H>(&mut self, host: &mut H) -> Option<S>
    where
        H: ViewHost<View = V>,
    {
        self.cancel_smooth_scroll();
        self.release_all(host);
        self.pending = None;
        self.dirty = true;
        tracing::debug!("detached");
        self.sampler.take()
    }
}
