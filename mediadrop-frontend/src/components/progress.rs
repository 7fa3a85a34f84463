use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SpinnerProps {
    pub message: Option<String>,
}

#[function_component(Spinner)]
pub fn spinner(props: &SpinnerProps) -> Html {
    html! {
        <div class="spinner-container">
            <div class="spinner"></div>
            if let Some(message) = &props.message {
                <div class="spinner-message">
                    {message}
                </div>
            }
        </div>
    }
}
