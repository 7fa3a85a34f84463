use mediadrop_types::{MediaKind, UploadOutcome, UploadResult};
use yew::prelude::*;

use crate::utils::file_utils::{format_file_size, get_file_icon};

#[derive(Properties, PartialEq)]
pub struct ResultCardProps {
    pub outcome: UploadOutcome,
}

#[function_component(ResultCard)]
pub fn result_card(props: &ResultCardProps) -> Html {
    let outcome = &props.outcome;

    match &outcome.result {
        Ok(result) => html! {
            <div class="result-card result-success">
                <div class="result-header">
                    <span class="result-icon">{get_file_icon(&result.content_type)}</span>
                    <span class="result-name">{&outcome.filename}</span>
                    <span class="result-kind">{result.file_type.as_str()}</span>
                </div>

                {media_preview(result)}

                <dl class="result-details">
                    <dt>{"Size"}</dt>
                    <dd>{format_file_size(result.size)}</dd>
                    <dt>{"Type"}</dt>
                    <dd>{&result.content_type}</dd>
                    <dt>{"Server filename"}</dt>
                    <dd class="mono">{&result.server_filename}</dd>
                    <dt>{"URL"}</dt>
                    <dd class="mono">
                        <a href={result.url.clone()} target="_blank">{&result.url}</a>
                    </dd>
                    <dt>{"Uploaded"}</dt>
                    <dd>{result.uploaded_at.to_rfc3339()}</dd>
                </dl>
            </div>
        },
        Err(failure) => html! {
            <div class="result-card result-error">
                <div class="result-header">
                    <span class="result-icon">{"❌"}</span>
                    <span class="result-name">{&outcome.filename}</span>
                </div>
                <p class="result-error-message">{failure.to_string()}</p>
            </div>
        },
    }
}

// Large files have no inline preview; fall back to the (mock) storage URL
fn media_preview(result: &UploadResult) -> Html {
    let src = result
        .preview_url
        .clone()
        .unwrap_or_else(|| result.url.clone());

    match result.file_type {
        MediaKind::Image => html! {
            <img class="result-preview" src={src} alt={result.filename.clone()} />
        },
        MediaKind::Video => html! {
            <video class="result-preview" src={src} controls={true}></video>
        },
        MediaKind::Audio => html! {
            <audio class="result-preview" src={src} controls={true}></audio>
        },
    }
}
