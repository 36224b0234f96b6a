//! Один параметр запроса на пространство модальных окон: активный child id.

use std::fmt::Debug;

/// Closed set of dialogs inside one namespace
pub trait ModalChild: Copy + Eq + Debug + Send + Sync + 'static {
    /// Plain-text value written to the URL
    fn param_value(&self) -> &'static str;

    fn from_param_value(value: &str) -> Option<Self>;
}

/// Raw `key=value` segments, in URL order and still percent-encoded
fn segments(search: &str) -> impl Iterator<Item = &str> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|segment| !segment.is_empty())
}

fn split_segment(segment: &str) -> (&str, &str) {
    segment.split_once('=').unwrap_or((segment, ""))
}

fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(|value| value.into_owned())
        .ok()
}

fn is_param(segment: &str, param: &str) -> bool {
    decode_component(split_segment(segment).0).as_deref() == Some(param)
}

/// Active child for `param`; absent or unrecognised values mean closed.
/// With a repeated parameter the first occurrence counts.
pub fn decode<C: ModalChild>(search: &str, param: &str) -> Option<C> {
    let segment = segments(search).find(|segment| is_param(segment, param))?;
    let raw = split_segment(segment).1;
    let child = decode_component(raw).and_then(|value| C::from_param_value(&value));
    if child.is_none() {
        log::debug!("Ignoring unknown modal child '{}' in '{}'", raw, param);
    }
    child
}

/// New query string with `param` set to `child` (or removed for `None`).
///
/// Only segments named `param` are touched; every other segment is copied
/// verbatim, duplicates and nested keys included. An existing `param` is
/// replaced in place, a new one is appended.
pub fn encode<C: ModalChild>(search: &str, param: &str, child: Option<C>) -> String {
    let own = child.map(|child| {
        format!(
            "{}={}",
            urlencoding::encode(param),
            urlencoding::encode(child.param_value())
        )
    });
    let mut written = false;
    let mut out: Vec<String> = Vec::new();

    for segment in segments(search) {
        if !is_param(segment, param) {
            out.push(segment.to_string());
            continue;
        }
        if let Some(own) = own.as_ref().filter(|_| !written) {
            out.push(own.clone());
            written = true;
        }
    }
    if let Some(own) = own.filter(|_| !written) {
        out.push(own);
    }

    if out.is_empty() {
        String::new()
    } else {
        format!("?{}", out.join("&"))
    }
}
