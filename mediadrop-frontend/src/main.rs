use yew::prelude::*;

mod components;
mod services;
mod utils;

use components::upload::Upload;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <div class="app">
            <header class="header">
                <h1 class="title">{"Mediadrop"}</h1>
                <p class="subtitle">{"Upload images, videos and audio"}</p>
            </header>

            <main class="main-content">
                <Upload />
            </main>
        </div>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
