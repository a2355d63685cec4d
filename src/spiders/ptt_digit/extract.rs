use log::{debug, warn};
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use url::Url;

use super::assemble::assemble_reply;
use super::model::{PostStub, Reply, DEFAULT_REPLY_COUNT_HINT};
use super::selectors::{Field, HubField, HubSelectors, Location, PageSelectors, PostField, ReplyField};
use crate::{ScraperError, ScraperResult};

pub type FieldValues<F> = HashMap<F, Vec<String>>;

/// Runs every field location of a page kind under `anchor`, except the ones in `skip`.
/// A field that matches nothing maps to an empty list.
pub fn extract_fields<F: Field>(
    anchor: ElementRef<'_>,
    fields: &[(F, Location)],
    skip: &[F],
) -> FieldValues<F> {
    fields
        .iter()
        .filter(|(field, _)| !skip.contains(field))
        .map(|(field, location)| (*field, location.select_all(anchor)))
        .collect()
}

/// First value of `field`, or an empty string.
pub fn first_value<F: Field>(values: &FieldValues<F>, field: F) -> String {
    values
        .get(&field)
        .and_then(|matches| matches.first())
        .cloned()
        .unwrap_or_default()
}

/// Builds one stub from a listing anchor. Fails when the anchor has no usable `url`.
pub fn extract_stub(
    anchor: ElementRef<'_>,
    base: &Url,
    hub: &HubSelectors,
) -> ScraperResult<PostStub> {
    let values = extract_fields(anchor, &hub.page.fields, &[]);

    let href = values
        .get(&HubField::Url)
        .and_then(|matches| matches.first())
        .ok_or_else(|| ScraperError::MissingField {
            field: HubField::Url.name(),
            url: base.clone(),
        })?;
    let url = base.join(href)?;

    let reply_count_hint = values
        .get(&HubField::Push)
        .and_then(|matches| matches.first())
        .cloned()
        .unwrap_or_else(|| DEFAULT_REPLY_COUNT_HINT.to_string());

    Ok(PostStub {
        url,
        reply_count_hint,
    })
}

/// One stub per listing anchor, in document order. Anchors without a usable `url` are dropped.
pub fn extract_listing(document: &Html, base: &Url, hub: &HubSelectors) -> Vec<PostStub> {
    let mut stubs = Vec::new();
    for (index, anchor) in document.select(&hub.page.root).enumerate() {
        match extract_stub(anchor, base, hub) {
            Ok(stub) => {
                debug!("Listing item {} on {}: {}", index, base, stub.url);
                stubs.push(stub);
            }
            Err(e) => warn!("Dropping listing item {} on {}: {}", index, base, e),
        }
    }
    stubs
}

pub fn extract_next_page(document: &Html, base: &Url, hub: &HubSelectors) -> Option<Url> {
    let href = hub.next_page.select_first(document.root_element())?;
    match base.join(&href) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Ignoring next page link {:?} on {}: {}", href, base, e);
            None
        }
    }
}

/// Post fields under the first `post.root` match. Every field is empty when the root is absent.
pub fn extract_post_fields(
    document: &Html,
    base: &Url,
    post: &PageSelectors<PostField>,
) -> FieldValues<PostField> {
    match document.select(&post.root).next() {
        Some(anchor) => extract_fields(anchor, &post.fields, &[]),
        None => {
            warn!("No post anchor found on {}", base);
            FieldValues::new()
        }
    }
}

/// One reply per `push.root` match, in document order.
pub fn extract_replies(document: &Html, push: &PageSelectors<ReplyField>) -> Vec<Reply> {
    document
        .select(&push.root)
        .map(|anchor| assemble_reply(&extract_fields(anchor, &push.fields, &[])))
        .collect()
}
