use std::time::Duration;

use foundation::math::{AlbersProjection, Vec2};
use foundation::time::{Timestamp, format_input_date, format_long_date};
use layers::boundary::{BoundaryLayer, BoundaryLayerSnapshot};
use layers::legend::{DurationLegend, SizeLegend};
use layers::svg::MapSvg;
use layers::tooltip::{TooltipContent, tooltip_position};
use layers::{FireLayer, Reconciler, RenderDiff, VisibleFire};
use runtime::{PlayOutcome, Playback, PlaybackState, TickOutcome, ToggleOutcome};
use scene::entity::CauseId;
use scene::key::FireKey;
use scene::query::{FireQuery, normalize_search};
use scene::selection::SelectionSet;
use tracing::{debug, trace};

use crate::config::ViewerConfig;
use crate::controls::{ControlPanel, play_button_label};
use crate::data::MapData;

/// Everything the user has chosen through the controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Always within `[0, last day index]`.
    pub day_index: usize,
    pub causes: SelectionSet,
    /// Raw search-box text; normalized on every update.
    pub search: String,
}

impl Selection {
    /// First day, every cause active, no search.
    pub fn initial(cause_count: usize) -> Self {
        Self {
            day_index: 0,
            causes: SelectionSet::full(cause_count as u32),
            search: String::new(),
        }
    }
}

/// Open detail card.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub key: FireKey,
    pub content: TooltipContent,
    /// Relative to the map container.
    pub position: Vec2,
}

/// Result of one update pass, for frontends to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct MapUpdate {
    /// Selected date, `%B %d, %Y`.
    pub heading: String,
    /// Selected date, `%Y-%m-%d`.
    pub picker_value: String,
    pub slider_value: usize,
    pub diff: RenderDiff,
    /// Fires on screen after the diff is applied.
    pub visible: usize,
}

/// Map controller. Owns the loaded data and all UI state; every control
/// event funnels into [`FireMap::update`].
#[derive(Debug)]
pub struct FireMap {
    config: ViewerConfig,
    data: MapData,
    fires: FireLayer,
    boundary: BoundaryLayerSnapshot,
    boundary_path: String,
    duration_legend: DurationLegend,
    size_legend: SizeLegend,
    selection: Selection,
    reconciler: Reconciler,
    playback: Playback,
    tooltip: Option<Tooltip>,
}

impl FireMap {
    /// Nothing is on screen until the first [`FireMap::update`].
    pub fn new(data: MapData, config: ViewerConfig) -> Self {
        let projection = AlbersProjection::new(config.albers());
        let boundary = BoundaryLayer::new().extract(&data.boundary, &projection);
        let boundary_path = boundary.path_data();
        let fires = FireLayer::new(projection);
        let duration_legend = DurationLegend::new(fires.color_scale().ramp());
        let size_legend = SizeLegend::new(config.width, fires.size_scale());
        let selection = Selection::initial(data.world.causes().len());

        debug!(
            days = data.world.days().len(),
            causes = data.world.causes().len(),
            policy = ?config.refresh_policy,
            "fire map created"
        );

        Self {
            reconciler: Reconciler::new(config.refresh_policy),
            playback: Playback::new(config.tick_period()),
            config,
            data,
            fires,
            boundary,
            boundary_path,
            duration_legend,
            size_legend,
            selection,
            tooltip: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn data(&self) -> &MapData {
        &self.data
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn boundary(&self) -> &BoundaryLayerSnapshot {
        &self.boundary
    }

    pub fn boundary_path(&self) -> &str {
        &self.boundary_path
    }

    pub fn duration_legend(&self) -> &DurationLegend {
        &self.duration_legend
    }

    pub fn size_legend(&self) -> &SizeLegend {
        &self.size_legend
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Delay between playback ticks.
    pub fn tick_period(&self) -> Duration {
        self.playback.period()
    }

    pub fn play_label(&self) -> &'static str {
        play_button_label(self.playback_state())
    }

    pub fn controls(&self) -> ControlPanel {
        ControlPanel::new(&self.data.world, &self.selection.causes)
    }

    /// On-screen fires in record order, as they were bound.
    pub fn rendered(&self) -> Vec<&VisibleFire> {
        self.reconciler.rendered()
    }

    pub fn last_day_index(&self) -> Option<usize> {
        self.data.world.days().last_index()
    }

    /// Midnight of the selected day.
    pub fn selected_time(&self) -> Option<Timestamp> {
        self.data.world.days().start_of(self.selection.day_index)
    }

    /// Recomputes the visible set and reconciles it against the screen.
    /// Always hides the tooltip.
    pub fn update(&mut self) -> MapUpdate {
        self.tooltip = None;

        let Some(at) = self.selected_time() else {
            let removed = self.reconciler.clear();
            return MapUpdate {
                heading: String::new(),
                picker_value: String::new(),
                slider_value: self.selection.day_index,
                diff: RenderDiff {
                    removed,
                    ..RenderDiff::default()
                },
                visible: 0,
            };
        };

        let search = normalize_search(&self.selection.search);
        let query = FireQuery {
            at,
            causes: &self.selection.causes,
            search: &search,
        };
        let snapshot = self.fires.extract(&self.data.world, &query);
        let diff = self.reconciler.reconcile(snapshot.fires);

        trace!(
            day = self.selection.day_index,
            visible = self.reconciler.len(),
            "map updated"
        );
        MapUpdate {
            heading: format_long_date(at),
            picker_value: format_input_date(at.date()),
            slider_value: self.selection.day_index,
            diff,
            visible: self.reconciler.len(),
        }
    }

    /// Clamps to the day range.
    pub fn set_day_index(&mut self, index: usize) -> MapUpdate {
        self.selection.day_index = index.min(self.last_day_index().unwrap_or(0));
        self.update()
    }

    /// Jumps to the day whose `%Y-%m-%d` form equals `value`. Values outside
    /// the range are ignored.
    pub fn pick_date(&mut self, value: &str) -> Option<MapUpdate> {
        let index = self.data.world.days().index_of_input_value(value)?;
        Some(self.set_day_index(index))
    }

    pub fn set_cause(&mut self, cause: CauseId, active: bool) -> MapUpdate {
        self.selection.causes.set(cause, active);
        self.update()
    }

    /// `None` for a cause the dataset does not contain.
    pub fn set_cause_active(&mut self, name: &str, active: bool) -> Option<MapUpdate> {
        let cause = self.data.world.cause_id(name)?;
        Some(self.set_cause(cause, active))
    }

    pub fn set_search(&mut self, raw: &str) -> MapUpdate {
        self.selection.search = raw.to_string();
        self.update()
    }

    pub fn play(&mut self) -> PlayOutcome {
        self.playback
            .play(self.selection.day_index, self.last_day_index())
    }

    pub fn pause(&mut self) -> bool {
        self.playback.pause()
    }

    /// Play/pause button.
    pub fn toggle_play(&mut self) -> ToggleOutcome {
        self.playback
            .toggle(self.selection.day_index, self.last_day_index())
    }

    /// One timer tick. Advances the day and updates while playing.
    pub fn tick(&mut self) -> (TickOutcome, Option<MapUpdate>) {
        let outcome = self
            .playback
            .tick(self.selection.day_index, self.last_day_index());
        match outcome {
            TickOutcome::Advanced(next) => (outcome, Some(self.set_day_index(next))),
            TickOutcome::Finished | TickOutcome::Idle => (outcome, None),
        }
    }

    /// Opens the detail card for a rendered fire. The card shows the values
    /// the circle was bound with.
    pub fn click_fire(
        &mut self,
        key: &FireKey,
        pointer: Vec2,
        container_origin: Vec2,
    ) -> Option<&Tooltip> {
        let fire = self.reconciler.get(key)?;
        self.tooltip = Some(Tooltip {
            key: key.clone(),
            content: fire.details.content(),
            position: tooltip_position(pointer, container_origin),
        });
        self.tooltip.as_ref()
    }

    /// Returns `true` if a card was open.
    pub fn click_background(&mut self) -> bool {
        self.tooltip.take().is_some()
    }

    /// Static SVG of the current screen, including legends.
    pub fn render_svg(&self) -> String {
        let fires: Vec<VisibleFire> = self.rendered().into_iter().cloned().collect();
        let heading = self.selected_time().map(format_long_date);
        MapSvg {
            width: self.config.width,
            height: self.config.height,
            heading: heading.as_deref(),
            boundary_path: &self.boundary_path,
            fires: &fires,
            duration_legend: &self.duration_legend,
            size_legend: &self.size_legend,
        }
        .render()
    }
}
