use maud::{Markup, Render, html};
use std::time::Duration;

/// How long a notification stays up before it dismisses itself.
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

impl Render for Notification {
    //the dismissal is an htmx trigger on the element itself, so if a swap removes the
    //notification first the timer goes with it
    fn render(&self) -> Markup {
        let colours = match self.kind {
            NotificationKind::Success => "bg-green-100 border-green-400 text-green-700",
            NotificationKind::Error => "bg-red-100 border-red-400 text-red-700",
        };

        html! {
            div class={"border px-4 py-3 rounded shadow-md " (colours)} role="alert"
                hx-get="/internal/empty" hx-trigger={"load delay:" (NOTIFICATION_LIFETIME.as_millis().to_string()) "ms"} hx-swap="outerHTML" {
                span {(self.message)}
            }
        }
    }
}

/// A notification for a fragment response, swapped out-of-band into the page's `#toasts`.
pub fn notification_oob(notification: &Notification) -> Markup {
    html! {
        div hx-swap-oob="beforeend:#toasts" {
            (notification)
        }
    }
}

pub fn render_table<const N: usize>(
    overall_title: &'static str,
    titles: [&'static str; N],
    items: Vec<[Markup; N]>,
) -> Markup {
    html! {
        div class="container mx-auto" {
            (title(overall_title))
            div class="overflow-x-auto" {
                table class="min-w-full bg-gray-800 rounded shadow-md" {
                    thead class="bg-gray-700" {
                        tr {
                            @for title in titles {
                                th class="py-2 px-4 text-left font-semibold text-gray-300" {(title)}
                            }
                        }
                    }
                    tbody {
                        @for row in items {
                            tr {
                                @for col in row {
                                    td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn form_element(id: &'static str, label: &'static str, input: Markup, error: Option<&str>) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (input)
            @if let Some(error) = error {
                p class="text-red-500 text-sm mt-1" {(error)}
            }
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    input_type: Option<&'static str>,
    value: &str,
    error: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input type=(input_type.unwrap_or("text")) id=(id) name=(id) value=(value) class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600" {}
        },
        error,
    )
}

pub fn radio_form_element<const N: usize>(
    id: &'static str,
    label: &'static str,
    options: [&'static str; N],
    selected: &str,
    error: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            div class="flex flex-row space-x-4" {
                @for option in options {
                    label class="text-gray-300 cursor-pointer" {
                        input type="radio" name=(id) value=(option) checked[option == selected] class="mr-2 leading-tight" {}
                        (option)
                    }
                }
            }
        },
        error,
    )
}

pub fn form_submit_button(label: Option<&str>) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" hx-disabled-elt="this" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (label.unwrap_or("Submit"))
            }
        }
    }
}
