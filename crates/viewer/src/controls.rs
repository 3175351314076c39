//! Control panel model: what each widget shows, independent of the DOM.

use foundation::time::format_input_date;
use runtime::PlaybackState;
use scene::FireWorld;
use scene::entity::CauseId;
use scene::selection::SelectionSet;

pub const PLAY_LABEL: &str = "▶ Play";
pub const PAUSE_LABEL: &str = "⏸ Pause";
pub const CAUSE_FILTER_LABEL: &str = "Filter by Cause:";
pub const SEARCH_LABEL: &str = "Search by Fire Name:";
pub const SEARCH_PLACEHOLDER: &str = "Search fire name...";

pub fn play_button_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Paused => PLAY_LABEL,
        PlaybackState::Playing => PAUSE_LABEL,
    }
}

/// Integer day slider over `[0, max]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SliderBounds {
    pub min: usize,
    pub max: usize,
    pub step: usize,
}

/// Date picker limits, formatted as `%Y-%m-%d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePickerBounds {
    pub min: String,
    pub max: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CauseOption {
    pub id: CauseId,
    pub name: String,
    pub checked: bool,
}

/// Static layout of the control panel for a loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPanel {
    pub slider: SliderBounds,
    pub picker: DatePickerBounds,
    /// One per distinct cause, sorted by name.
    pub causes: Vec<CauseOption>,
}

impl ControlPanel {
    pub fn new(world: &FireWorld, active: &SelectionSet) -> Self {
        let days = world.days();
        let picker = DatePickerBounds {
            min: days.first().map(format_input_date).unwrap_or_default(),
            max: days.last().map(format_input_date).unwrap_or_default(),
        };
        let causes = world
            .causes()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let id = CauseId(i as u32);
                CauseOption {
                    id,
                    name: name.clone(),
                    checked: active.contains(id),
                }
            })
            .collect();

        Self {
            slider: SliderBounds {
                min: 0,
                max: days.last_index().unwrap_or(0),
                step: 1,
            },
            picker,
            causes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlPanel, PAUSE_LABEL, PLAY_LABEL, play_button_label};
    use crate::data::fixtures::map_data;
    use pretty_assertions::assert_eq;
    use runtime::PlaybackState;
    use scene::entity::CauseId;
    use scene::selection::SelectionSet;

    #[test]
    fn panel_reflects_dataset() {
        let data = map_data();
        let mut active = SelectionSet::full(data.world.causes().len() as u32);
        active.remove(CauseId(0));
        let panel = ControlPanel::new(&data.world, &active);

        assert_eq!(panel.slider.min, 0);
        assert_eq!(panel.slider.max, 2);
        assert_eq!(panel.slider.step, 1);
        assert_eq!(panel.picker.min, "2020-08-01");
        assert_eq!(panel.picker.max, "2020-08-03");

        let names: Vec<(&str, bool)> = panel
            .causes
            .iter()
            .map(|c| (c.name.as_str(), c.checked))
            .collect();
        assert_eq!(names, vec![("Human", false), ("Lightning", true)]);
    }

    #[test]
    fn button_label_follows_state() {
        assert_eq!(play_button_label(PlaybackState::Paused), PLAY_LABEL);
        assert_eq!(play_button_label(PlaybackState::Playing), PAUSE_LABEL);
    }
}
