use crate::{
    components::{progress::Spinner, results::ResultCard},
    services::api::{
        filter_supported, upload_all, ApiClient, Capabilities, SelectedFile, UploadLimits,
        UploadOutcome, MB, SUPPORTED_TYPES,
    },
    utils::file_utils::{format_file_size, get_file_icon},
};
use web_sys::{Event, HtmlInputElement};
use yew::prelude::*;

#[function_component(Upload)]
pub fn upload() -> Html {
    let file_input_ref = use_node_ref();
    let selected_files = use_state(Vec::<SelectedFile>::new);
    let uploading = use_state(|| false);
    let outcomes = use_state(Vec::<UploadOutcome>::new);
    let capabilities = use_state(|| None::<Capabilities>);
    let api_client = use_state(ApiClient::new);

    // Load the server's limits once for the hint text
    {
        let capabilities = capabilities.clone();
        let api_client = (*api_client).clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match api_client.fetch_capabilities().await {
                    Ok(document) => capabilities.set(Some(document)),
                    Err(e) => log::warn!("Failed to load upload capabilities: {}", e),
                }
            });
            || ()
        });
    }

    let on_file_select = {
        let selected_files = selected_files.clone();

        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(list) = input.files() {
                let picked: Vec<SelectedFile> = (0..list.length())
                    .filter_map(|i| list.get(i))
                    .map(SelectedFile::from)
                    .collect();

                // Unsupported files are dropped without notice
                let media = filter_supported(picked, |file| file.mime_type.as_str());

                let mut files = (*selected_files).clone();
                files.extend(media);
                selected_files.set(files);
            }
            input.set_value("");
        })
    };

    let trigger_file_input = {
        let file_input_ref = file_input_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = file_input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let remove_file = {
        let selected_files = selected_files.clone();
        Callback::from(move |index: usize| {
            let mut files = (*selected_files).clone();
            if index < files.len() {
                files.remove(index);
            }
            selected_files.set(files);
        })
    };

    let start_upload = {
        let selected_files = selected_files.clone();
        let uploading = uploading.clone();
        let outcomes = outcomes.clone();
        let api_client = api_client.clone();

        Callback::from(move |_: MouseEvent| {
            if selected_files.is_empty() || *uploading {
                return;
            }

            let items: Vec<(String, SelectedFile)> = selected_files
                .iter()
                .cloned()
                .map(|file| (file.name.clone(), file))
                .collect();
            let api_client = (*api_client).clone();
            let selected_files = selected_files.clone();
            let uploading = uploading.clone();
            let outcomes = outcomes.clone();

            uploading.set(true);

            wasm_bindgen_futures::spawn_local(async move {
                let results = upload_all(
                    items,
                    |file| {
                        let api_client = api_client.clone();
                        async move { api_client.upload_file(&file).await }
                    },
                    |outcome| {
                        log::info!(
                            "Upload #{} ({}) settled: {}",
                            outcome.index,
                            outcome.filename,
                            if outcome.is_success() { "ok" } else { "failed" }
                        );
                    },
                )
                .await;

                outcomes.set(results);
                selected_files.set(Vec::new());
                uploading.set(false);
            });
        })
    };

    let limits_hint = match &*capabilities {
        Some(document) => format!(
            "Images and audio up to {}, video up to {}",
            document.max_file_size, document.max_video_size
        ),
        None => {
            let limits = UploadLimits::default();
            format!(
                "Images and audio up to {}MB, video up to {}MB",
                limits.max_file_size / MB,
                limits.max_video_size / MB
            )
        }
    };

    html! {
        <div class="upload">
            <input
                ref={file_input_ref}
                type="file"
                class="hidden"
                multiple={true}
                accept={SUPPORTED_TYPES.join(",")}
                onchange={on_file_select}
                disabled={*uploading}
            />

            <div
                class={classes!("drop-zone", uploading.then_some("disabled"))}
                onclick={if *uploading { Callback::noop() } else { trigger_file_input }}
            >
                <p class="drop-zone-title">{"Click to select media files"}</p>
                <p class="drop-zone-hint">{limits_hint}</p>
            </div>

            if !selected_files.is_empty() {
                <>
                <ul class="selected-files">
                    { for selected_files.iter().enumerate().map(|(index, file)| {
                        let on_remove = {
                            let remove_file = remove_file.clone();
                            Callback::from(move |_: MouseEvent| remove_file.emit(index))
                        };
                        html! {
                            <li class="selected-file" key={index}>
                                <span class="file-icon">{get_file_icon(&file.mime_type)}</span>
                                <span class="file-name">{&file.name}</span>
                                <span class="file-size">{format_file_size(file.size)}</span>
                                <button
                                    class="remove-btn"
                                    title="Remove file"
                                    onclick={on_remove}
                                    disabled={*uploading}
                                >
                                    {"✕"}
                                </button>
                            </li>
                        }
                    })}
                </ul>

                <button
                    class="upload-btn"
                    onclick={start_upload}
                    disabled={*uploading}
                >
                    {format!("Upload {} file{}", selected_files.len(), if selected_files.len() == 1 { "" } else { "s" })}
                </button>
                </>
            }

            if *uploading {
                <Spinner message={Some("Uploading...".to_string())} />
            }

            if !outcomes.is_empty() {
                <div class="results">
                    <h2 class="results-title">{"Upload Results"}</h2>
                    { for outcomes.iter().map(|outcome| html! {
                        <ResultCard key={outcome.index} outcome={outcome.clone()} />
                    })}
                </div>
            }
        </div>
    }
}
