use gpui::*;
use gpui_component::{Root, TitleBar};

mod logging;
mod mini_editor_story;

use mini_editor_story::MiniEditorStory;

fn main() {
    logging::init();

    let app = Application::new();

    app.run(move |cx| {
        gpui_component::init(cx);
        gpui_mini_editor::init(cx);
        cx.activate(true);

        cx.spawn(async move |cx| {
            cx.open_window(
                WindowOptions {
                    titlebar: Some(TitleBar::title_bar_options()),
                    ..Default::default()
                },
                |window, cx| {
                    window.set_window_title("Mini Editor");
                    let view = MiniEditorStory::view(window, cx);
                    cx.new(|cx| Root::new(view, window, cx))
                },
            )?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });
}
