use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures_channel::mpsc::UnboundedSender;
use futures_util::StreamExt;
use reqwest::Client;

use crate::config::{API_BASE_URL, READER_ELEMENT_ID};
use crate::core::record::Payload;
use crate::dashboard::RecordsDashboard;
use crate::t;

use super::device;
use super::error::ScanError;
use super::fetch::fetch_payload;
use super::session::{ScanPhase, ScanSession};
use super::Camera;

type SenderSlot = Rc<RefCell<Option<UnboundedSender<ScanEvent>>>>;

/// Camera preview, manual code entry, and the fetched dashboard.
#[component]
pub fn ScanView() -> Element {
    let session = use_signal(ScanSession::default);
    let mut typed_code = use_signal(String::new);

    let camera = use_hook(|| Rc::new(Camera::new(READER_ELEMENT_ID)));
    let client = use_hook(Client::new);
    let sender_slot: SenderSlot = use_hook(|| Rc::new(RefCell::new(None)));

    let coroutine = {
        let camera = camera.clone();
        let sender_slot = sender_slot.clone();

        use_coroutine(move |mut rx: UnboundedReceiver<ScanEvent>| {
            let camera = camera.clone();
            let client = client.clone();
            let sender_slot = sender_slot.clone();
            let mut session = session;

            async move {
                while let Some(event) = rx.next().await {
                    match event {
                        ScanEvent::Open => {
                            let Some(generation) = session.with_mut(|s| s.open()) else {
                                tracing::debug!("scanner already active");
                                continue;
                            };
                            let Some(sender) = sender_slot.borrow().as_ref().cloned() else {
                                continue;
                            };
                            let on_decode = Box::new(move |text: String| {
                                let _ = sender.unbounded_send(ScanEvent::Decoded { generation, text });
                            });

                            match device::acquire(&*camera, on_decode).await {
                                Ok(_) => {
                                    if !session.with_mut(|s| s.device_started(generation)) {
                                        device::release(&*camera).await;
                                    }
                                }
                                Err(err) => {
                                    tracing::error!(%err, "camera could not be started");
                                    session.with_mut(|s| s.device_failed(generation, err));
                                }
                            }
                        }
                        ScanEvent::Decoded { generation, text } => {
                            if !session.with_mut(|s| s.decoded(generation, &text)) {
                                continue;
                            }
                            tracing::info!(%text, "code scanned");
                            device::release(&*camera).await;
                            request(session, client.clone(), &sender_slot);
                        }
                        ScanEvent::Typed(text) => {
                            let text = text.trim().to_string();
                            if text.is_empty() {
                                continue;
                            }
                            let held = session.peek().holds_device();
                            if session.with_mut(|s| s.enter_code(&text)).is_none() {
                                continue;
                            }
                            tracing::info!(%text, "code entered");
                            if held {
                                device::release(&*camera).await;
                            }
                            request(session, client.clone(), &sender_slot);
                        }
                        ScanEvent::Fetched {
                            generation,
                            outcome,
                        } => {
                            if let Err(err) = &outcome {
                                tracing::error!(%err, "record fetch failed");
                            }
                            if !session.with_mut(|s| s.finish(generation, outcome)) {
                                tracing::debug!(generation, "dropping stale fetch result");
                            }
                        }
                        ScanEvent::Close => {
                            let held = session.peek().holds_device();
                            session.with_mut(|s| s.cancel());
                            if held {
                                device::release(&*camera).await;
                            }
                        }
                    }
                }
            }
        })
    };

    sender_slot.borrow_mut().replace(coroutine.tx());

    {
        let camera = camera.clone();
        use_drop(move || {
            spawn_forever(async move {
                device::release(&*camera).await;
            });
        });
    }

    let snapshot = session();
    let scanner_open = snapshot.scanner_open();
    let busy = !matches!(
        snapshot.phase,
        ScanPhase::Idle | ScanPhase::Done | ScanPhase::Failed(_)
    );
    let start_label = if snapshot.payload().is_some() {
        t!("scan-again")
    } else {
        t!("scan-start")
    };
    let reader_class = if scanner_open {
        "scanner__reader"
    } else {
        "scanner__reader scanner__reader--hidden"
    };
    let error_text = snapshot
        .error()
        .filter(|err| err.is_user_facing())
        .map(error_message);

    rsx! {
        article { class: "scanner",
            div { class: "scanner__controls",
                button {
                    r#type: "button",
                    class: "button button--primary scanner__start",
                    disabled: busy,
                    onclick: move |_| coroutine.send(ScanEvent::Open),
                    "{start_label}"
                }
                if scanner_open {
                    button {
                        r#type: "button",
                        class: "button button--ghost scanner__close",
                        onclick: move |_| coroutine.send(ScanEvent::Close),
                        {t!("scan-close")}
                    }
                }
            }

            if snapshot.phase == ScanPhase::Starting {
                p { class: "scanner__status", {t!("scan-starting")} }
            } else if snapshot.phase == ScanPhase::Scanning {
                p { class: "scanner__status", {t!("scan-hint")} }
            }

            // The element must exist before the camera backend binds to it.
            div { id: READER_ELEMENT_ID, class: reader_class }

            div { class: "scanner__manual",
                label { r#for: "scanner-code", {t!("scan-manual-label")} }
                input {
                    id: "scanner-code",
                    r#type: "text",
                    placeholder: "P100,L2,05/01/2024",
                    value: "{typed_code}",
                    oninput: move |evt| typed_code.set(evt.value()),
                    onkeydown: move |evt| {
                        if evt.key() == Key::Enter {
                            coroutine.send(ScanEvent::Typed(typed_code()));
                        }
                    },
                }
                button {
                    r#type: "button",
                    class: "button scanner__submit",
                    disabled: snapshot.is_loading(),
                    onclick: move |_| coroutine.send(ScanEvent::Typed(typed_code())),
                    {t!("scan-manual-submit")}
                }
            }

            if snapshot.is_loading() {
                p { class: "scanner__loading", role: "status", {t!("scan-loading")} }
            }

            if let Some(message) = error_text {
                div { class: "scanner__error", role: "alert", "{message}" }
            }

            if let Some(payload) = snapshot.payload().cloned() {
                RecordsDashboard { payload }
            }
        }
    }
}

/// Validates the latched code and, when it parses, fetches in the background.
fn request(mut session: Signal<ScanSession>, client: Client, sender_slot: &SenderSlot) {
    let generation = session.peek().generation;
    let Some(query) = session.with_mut(|s| s.begin_fetch()) else {
        if let Some(err) = session.peek().error().filter(|err| err.is_validation()) {
            tracing::warn!(%err, "scanned code rejected");
        }
        return;
    };
    let Some(sender) = sender_slot.borrow().as_ref().cloned() else {
        return;
    };

    spawn(async move {
        let outcome = fetch_payload(&client, API_BASE_URL, &query).await;
        let _ = sender.unbounded_send(ScanEvent::Fetched {
            generation,
            outcome,
        });
    });
}

fn error_message(err: &ScanError) -> String {
    match err {
        ScanError::InvalidPayloadFormat { parts } => {
            t!("scan-error-format", parts = parts.to_string())
        }
        ScanError::InvalidDateFormat(raw) => t!("scan-error-date", raw = raw.clone()),
        ScanError::DeviceUnavailable(_) => t!("scan-error-no-camera"),
        ScanError::DeviceStartFailure(detail) => t!("scan-error-camera", detail = detail.clone()),
        ScanError::FetchFailure(detail) => t!("scan-error-fetch", detail = detail.clone()),
        ScanError::DeviceReleaseFailure(detail) => {
            t!("scan-error-generic", detail = detail.clone())
        }
    }
}

#[derive(Debug)]
enum ScanEvent {
    Open,
    Decoded {
        generation: u64,
        text: String,
    },
    Typed(String),
    Fetched {
        generation: u64,
        outcome: Result<Payload, ScanError>,
    },
    Close,
}
