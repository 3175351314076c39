use foundation::math::Vec2;
use layers::RefreshPolicy;
use pretty_assertions::assert_eq;
use runtime::{TickOutcome, ToggleOutcome};
use scene::key::FireKey;
use viewer::{FireMap, MapData, ViewerConfig};

const FIRES: &str = include_str!("fixtures/fires.json");
const TOPOLOGY: &str = include_str!("fixtures/california.topo.json");

fn load(config: ViewerConfig) -> FireMap {
    let data = MapData::from_json(FIRES, TOPOLOGY, &config).unwrap();
    FireMap::new(data, config)
}

fn rendered_keys(map: &FireMap) -> Vec<String> {
    map.rendered().iter().map(|f| f.key.to_string()).collect()
}

#[test]
fn loads_fixture_dataset() {
    let map = load(ViewerConfig::default());
    let world = &map.data().world;
    assert_eq!(world.len(), 6);
    assert_eq!(world.causes(), &["Human".to_string(), "Natural".to_string()]);

    let panel = map.controls();
    assert_eq!(panel.picker.min, "2020-09-05");
    assert_eq!(panel.picker.max, "2020-09-07");
    assert_eq!(panel.slider.max, 2);
    assert!(panel.causes.iter().all(|c| c.checked));

    assert!(!map.boundary().rings.is_empty());
    assert!(map.boundary_path().starts_with('M'));
}

#[test]
fn only_well_formed_active_fires_are_drawn() {
    let mut map = load(ViewerConfig::default());

    let first = map.update();
    assert_eq!(first.heading, "September 05, 2020");
    assert_eq!(rendered_keys(&map), vec!["id:1001", "id:1003"]);
    assert_eq!(first.diff.added.len(), 2);

    let last = map.set_day_index(2);
    assert_eq!(rendered_keys(&map), vec!["id:1001", "id:1002"]);
    let added: Vec<String> = last.diff.added.iter().map(|f| f.key.to_string()).collect();
    assert_eq!(added, vec!["id:1002"]);
    let removed: Vec<String> = last.diff.removed.iter().map(ToString::to_string).collect();
    assert_eq!(removed, vec!["id:1003"]);
    assert_eq!(last.diff.untouched, 1);
}

#[test]
fn tooltip_formats_fixture_values() {
    let mut map = load(ViewerConfig::default());
    map.set_day_index(2);
    let keys: Vec<_> = map.rendered().iter().map(|f| f.key.clone()).collect();

    let creek = map
        .click_fire(&keys[0], Vec2::new(50.0, 60.0), Vec2::new(0.0, 0.0))
        .unwrap()
        .content
        .clone();
    assert_eq!(creek.title, "CREEK");
    assert_eq!(creek.row("Size"), Some("379,895 acres"));
    assert_eq!(creek.row("Duration"), Some("5.8 days"));
    assert_eq!(creek.row("Discovered"), Some("September 04, 2020"));
    assert_eq!(creek.row("Contained"), Some("September 10, 2020"));

    let bobcat = map
        .click_fire(&keys[1], Vec2::new(50.0, 60.0), Vec2::new(0.0, 0.0))
        .unwrap()
        .content
        .clone();
    assert_eq!(bobcat.title, "Bobcat");
    assert_eq!(bobcat.row("Size"), Some("115,796 acres"));
    assert_eq!(bobcat.row("Duration"), Some("Unknown"));
    assert_eq!(bobcat.row("Contained"), Some("N/A"));

    map.set_day_index(0);
    assert!(map.tooltip().is_none());
    let unnamed = map
        .click_fire(&FireKey("id:1003".to_string()), Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0))
        .unwrap()
        .content
        .clone();
    assert_eq!(unnamed.title, "(Unnamed Fire)");
    assert_eq!(unnamed.row("Size"), Some("12.5 acres"));
    assert_eq!(unnamed.row("Duration"), Some("2.0 days"));
}

#[test]
fn empty_cause_gets_a_checkbox_and_is_drawn() {
    let fires = r#"[
        {"FIRE_NAME": "Blank", "latitude": 37.0, "longitude": -120.0, "FIRE_SIZE": 50,
         "DISCOVERY_DATETIME": "2020-09-05 10:00:00", "CONT_DATETIME": null,
         "FIRE_DURATION_DAYS": 1.0, "NWCG_GENERAL_CAUSE": "", "FOD_ID": 1},
        {"FIRE_NAME": "Known", "latitude": 36.5, "longitude": -119.5, "FIRE_SIZE": 80,
         "DISCOVERY_DATETIME": "2020-09-05 11:00:00", "CONT_DATETIME": null,
         "FIRE_DURATION_DAYS": 2.0, "NWCG_GENERAL_CAUSE": "Human", "FOD_ID": 2}
    ]"#;
    let config = ViewerConfig::default();
    let data = MapData::from_json(fires, TOPOLOGY, &config).unwrap();
    let mut map = FireMap::new(data, config);

    let update = map.pick_date("2020-09-06").unwrap();
    assert_eq!(update.visible, 2);
    assert_eq!(rendered_keys(&map), vec!["id:1", "id:2"]);

    let checkboxes: Vec<(String, bool)> = map
        .controls()
        .causes
        .into_iter()
        .map(|c| (c.name, c.checked))
        .collect();
    assert_eq!(
        checkboxes,
        vec![(String::new(), true), ("Human".to_string(), true)]
    );

    let update = map.set_cause_active("", false).unwrap();
    assert_eq!(update.visible, 1);
    assert_eq!(rendered_keys(&map), vec!["id:2"]);
}

#[test]
fn headless_playback_walks_every_day() {
    let config = ViewerConfig {
        refresh_policy: RefreshPolicy::RefreshOnMatch,
        ..ViewerConfig::default()
    };
    let mut map = load(config);
    map.update();

    assert_eq!(map.toggle_play(), ToggleOutcome::Started);
    let mut headings = Vec::new();
    loop {
        let (outcome, update) = map.tick();
        match outcome {
            TickOutcome::Advanced(_) => {
                let update = update.unwrap();
                assert!(update.diff.updated.is_empty());
                headings.push(update.heading);
            }
            TickOutcome::Finished => break,
            TickOutcome::Idle => panic!("tick while paused"),
        }
    }
    assert_eq!(headings, vec!["September 06, 2020", "September 07, 2020"]);
    assert_eq!(map.toggle_play(), ToggleOutcome::AtEnd);
}

#[test]
fn static_svg_contains_screen_and_legends() {
    let mut map = load(ViewerConfig::default());
    map.set_search("creek");
    let svg = map.render_svg();
    assert_eq!(svg.matches("<circle data-key").count(), 1);
    assert!(svg.contains(r#"data-key="id:1001""#));
    assert!(svg.contains("Fire Size"));
    assert!(svg.contains(">100k acres</text>"));
}
