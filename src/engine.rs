use imgui::Condition;

use crate::{
    demo::{DemoState, FrameInput},
    scenes,
};

/// Advances the active scene by one frame and builds the debug panel.
pub fn update(state: &mut DemoState, frame: &FrameInput, ui: &imgui::Ui) -> anyhow::Result<()> {
    state.update(frame);

    if !state.show_debug_panel {
        return Ok(());
    }

    let mut selected_scene = state.scene_index();
    let titles = scenes::SCENES
        .iter()
        .map(|entry| entry.title)
        .collect::<Vec<_>>();

    ui.window("Debug")
        .position([10.0, 10.0], Condition::FirstUseEver)
        .always_auto_resize(true)
        .build(|| {
            ui.text(format!(
                "{:.0} fps, {:.1} s in scene",
                ui.io().framerate,
                frame.elapsed
            ));
            ui.combo_simple_string("Scene", &mut selected_scene, &titles);

            let camera = &mut state.context.camera;
            ui.slider("Camera FOV", 20.0, 120.0, &mut camera.fov_y);
            let position = camera.position;
            ui.text(format!(
                "Camera at ({:.2}, {:.2}, {:.2})",
                position.x, position.y, position.z
            ));

            ui.separator();
            state.debug_ui(ui);

            ui.separator();
            ui.text_disabled("H: hide panel  Tab: next scene  F: fullscreen");
        });

    if selected_scene != state.scene_index() {
        state.switch_to_index(selected_scene)?;
    }

    Ok(())
}
