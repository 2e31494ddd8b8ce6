use std::time::Duration;

use disclosure_headless::{fallback_visible, ImageLoadingStatus};

use super::*;

const AVATAR_CLASS: &str = "relative flex h-10 w-10 shrink-0 overflow-hidden rounded-full";

const IMAGE_CLASS: &str = "aspect-square h-full w-full";

const FALLBACK_CLASS: &str = "flex h-full w-full items-center justify-center rounded-full bg-muted";

#[derive(Clone, Copy)]
struct AvatarStatus(RwSignal<ImageLoadingStatus>);

fn image_status_token(status: ImageLoadingStatus) -> &'static str {
    match status {
        ImageLoadingStatus::Idle => "idle",
        ImageLoadingStatus::Loading => "loading",
        ImageLoadingStatus::Loaded => "loaded",
        ImageLoadingStatus::Error => "error",
    }
}

#[component]
/// Round user image with a fallback shown until the image loads.
pub fn Avatar(
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let status = create_rw_signal(ImageLoadingStatus::Idle);
    provide_context(AvatarStatus(status));
    view! {
        <span
            class=part_class(AVATAR_CLASS, class.as_deref())
            data-ui-primitive="true"
            data-ui-kind="avatar"
            data-state=move || image_status_token(status.get())
            {..attrs}
        >
            {children()}
        </span>
    }
}

fn use_avatar_status(part: &'static str) -> RwSignal<ImageLoadingStatus> {
    match disclosure_headless::require_root(use_context::<AvatarStatus>(), part) {
        Ok(AvatarStatus(status)) => status,
        Err(err) => panic!("{err} (Avatar)"),
    }
}

#[component]
/// Image of the enclosing [`Avatar`]; hidden until it has loaded.
pub fn AvatarImage(
    #[prop(into)] src: MaybeSignal<String>,
    #[prop(optional, into)] alt: Option<String>,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
) -> impl IntoView {
    let status = use_avatar_status("AvatarImage");
    let effect_src = src.clone();
    create_effect(move |_| {
        let src = &effect_src;
        let next = if src.with(String::is_empty) {
            ImageLoadingStatus::Error
        } else {
            ImageLoadingStatus::Loading
        };
        status.set(next);
    });
    view! {
        <img
            src=move || src.get()
            alt=alt
            class=part_class(IMAGE_CLASS, class.as_deref())
            hidden=move || status.get() != ImageLoadingStatus::Loaded
            data-ui-kind="avatar-image"
            on:load=move |_| status.set(ImageLoadingStatus::Loaded)
            on:error=move |_| status.set(ImageLoadingStatus::Error)
            {..attrs}
        />
    }
}

#[component]
/// Placeholder shown while the image is missing. `delay_ms` holds it back so fast
/// loads do not flash it.
pub fn AvatarFallback(
    #[prop(optional)] delay_ms: Option<u64>,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: ChildrenFn,
) -> impl IntoView {
    let status = use_avatar_status("AvatarFallback");
    let delay_elapsed = create_rw_signal(delay_ms.is_none());

    if let Some(delay_ms) = delay_ms {
        match set_timeout_with_handle(
            move || delay_elapsed.set(true),
            Duration::from_millis(delay_ms),
        ) {
            Ok(handle) => on_cleanup(move || handle.clear()),
            Err(err) => {
                logging::warn!("AvatarFallback: delay timer not started: {err:?}");
                delay_elapsed.set(true);
            }
        }
    }

    let class = part_class(FALLBACK_CLASS, class.as_deref());
    view! {
        <Show
            when=move || fallback_visible(status.get(), delay_elapsed.get())
            fallback=|| ()
        >
            <span class=class.clone() data-ui-kind="avatar-fallback" {..attrs.clone()}>
                {children()}
            </span>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_tokens_match_data_state() {
        assert_eq!(image_status_token(ImageLoadingStatus::Idle), "idle");
        assert_eq!(image_status_token(ImageLoadingStatus::Loaded), "loaded");
        assert_eq!(image_status_token(ImageLoadingStatus::Error), "error");
    }
}
