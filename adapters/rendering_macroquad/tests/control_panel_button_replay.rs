use conquest_core::UnitType;
use conquest_rendering::UiAction;
use conquest_rendering_macroquad::ControlPanelInputState;

fn run_sequence(sequence: &[Option<UiAction>]) -> Vec<Vec<UiAction>> {
    let mut state = ControlPanelInputState::default();
    let mut frames = Vec::new();
    for pressed in sequence {
        frames.push(state.take_actions());
        if let Some(action) = pressed {
            state.register(*action);
        }
    }

    // Flush any trailing latched press so the harness observes the final action.
    frames.push(state.take_actions());
    frames
}

#[test]
fn control_panel_presses_fire_once_on_the_next_frame() {
    let button_sequence = [
        None,
        Some(UiAction::NewGame),
        None,
        Some(UiAction::ArmMove),
        Some(UiAction::Produce(UnitType::Fighter)),
        None,
    ];
    let expected = vec![
        vec![],
        vec![],
        vec![UiAction::NewGame],
        vec![],
        vec![UiAction::ArmMove],
        vec![UiAction::Produce(UnitType::Fighter)],
        vec![],
    ];

    let first_run = run_sequence(&button_sequence);
    let second_run = run_sequence(&button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn presses_within_one_frame_keep_their_order() {
    let mut state = ControlPanelInputState::default();
    state.register(UiAction::Deselect);
    state.register(UiAction::EndTurn);

    assert_eq!(
        state.take_actions(),
        vec![UiAction::Deselect, UiAction::EndTurn]
    );
    assert!(state.take_actions().is_empty());
}
