//! Query option encoding.
//!
//! Option types describe their query parameters through [`ToQueryParams`]:
//! an ordered list of `key → value` where `None` marks a field left at its
//! zero value, which is never sent. [`add_url_options`] merges those pairs
//! into a URL string.
//!
//! # Example
//!
//! ```
//! use calendly_core::{ToQueryParams, add_url_options};
//!
//! struct HasName {
//!     has_name: bool,
//! }
//!
//! impl ToQueryParams for HasName {
//!     fn to_query_params(&self) -> calendly_core::Result<Vec<(String, Option<String>)>> {
//!         Ok(vec![(
//!             "has_name".to_string(),
//!             self.has_name.then(|| "true".to_string()),
//!         )])
//!     }
//! }
//!
//! let url = add_url_options("http://host:80", Some(&HasName { has_name: true })).unwrap();
//! assert_eq!(url, "http://host:80?has_name=true");
//! ```

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::Result;

/// Base used to validate relative references such as `users/me/event_types`.
const RELATIVE_BASE: &str = "http://relative.invalid/";

/// Types that map their fields to query parameters.
pub trait ToQueryParams {
    /// Query parameters in field order; `None` values are omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be expressed as key/value pairs.
    fn to_query_params(&self) -> Result<Vec<(String, Option<String>)>>;
}

impl ToQueryParams for () {
    fn to_query_params(&self) -> Result<Vec<(String, Option<String>)>> {
        Ok(Vec::new())
    }
}

/// Adapter reflecting any serde record into query parameters.
///
/// Field names follow the serde attributes (`rename`, `rename_all`,
/// `skip_serializing_if`). Scalars and sequences are not records and fail with
/// [`Error::QuerySerialization`](crate::Error::QuerySerialization).
#[derive(Debug, Clone, Copy)]
pub struct SerdeQuery<'a, T: ?Sized>(pub &'a T);

impl<T: serde::Serialize + ?Sized> ToQueryParams for SerdeQuery<'_, T> {
    fn to_query_params(&self) -> Result<Vec<(String, Option<String>)>> {
        let encoded = crate::to_query_string(self.0)?;
        Ok(form_urlencoded::parse(encoded.as_bytes())
            .map(|(key, value)| (key.into_owned(), Some(value.into_owned())))
            .collect())
    }
}

/// Merge `options` into the query component of `url`.
///
/// - `None` returns the input unchanged.
/// - Options without any present value return the input unchanged.
/// - Keys set by the options replace existing keys of the same name; other
///   existing keys are kept. The merged query is encoded with sorted keys.
///
/// `url` may be absolute or a relative reference.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) for a malformed
/// URL, or the error raised by the options.
pub fn add_url_options<Q>(url: &str, options: Option<&Q>) -> Result<String>
where
    Q: ToQueryParams + ?Sized,
{
    let Some(options) = options else {
        return Ok(url.to_owned());
    };

    validate(url)?;

    let mut overrides: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in options.to_query_params()? {
        if let Some(value) = value {
            overrides.entry(key).or_default().push(value);
        }
    }
    if overrides.is_empty() {
        return Ok(url.to_owned());
    }

    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in query.map(|q| form_urlencoded::parse(q.as_bytes())).into_iter().flatten() {
        values
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    values.extend(overrides);

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, list) in &values {
        for value in list {
            serializer.append_pair(key, value);
        }
    }

    let mut merged = String::from(path);
    merged.push('?');
    merged.push_str(&serializer.finish());
    if let Some(fragment) = fragment {
        merged.push('#');
        merged.push_str(fragment);
    }
    Ok(merged)
}

fn validate(url: &str) -> Result<()> {
    match url::Url::parse(url) {
        Ok(_) => Ok(()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url::Url::parse(RELATIVE_BASE)?.join(url)?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::Error;

    struct HasName {
        has_name: bool,
    }

    impl ToQueryParams for HasName {
        fn to_query_params(&self) -> Result<Vec<(String, Option<String>)>> {
            Ok(vec![(
                "has_name".to_string(),
                self.has_name.then(|| "true".to_string()),
            )])
        }
    }

    #[derive(serde::Serialize)]
    #[serde(rename_all = "snake_case")]
    struct Filter {
        #[serde(skip_serializing_if = "Option::is_none")]
        include: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        events: Vec<String>,
    }

    #[test]
    fn absent_options_return_input() {
        let url = add_url_options::<HasName>("http://host:80", None).expect("merge");
        check!(url == "http://host:80");
    }

    #[test]
    fn absent_options_never_validate() {
        let url = add_url_options::<HasName>("http://[::1", None).expect("merge");
        check!(url == "http://[::1");
    }

    #[test]
    fn empty_options_return_input() {
        check!(add_url_options("http://host:80", Some(&())).expect("merge") == "http://host:80");
        check!(
            add_url_options("http://host:80", Some(&HasName { has_name: false })).expect("merge")
                == "http://host:80"
        );
    }

    #[test]
    fn present_option_is_appended() {
        let url = add_url_options("http://host:80", Some(&HasName { has_name: true }))
            .expect("merge");
        check!(url == "http://host:80?has_name=true");
    }

    #[test]
    fn options_override_and_preserve() {
        let url = add_url_options(
            "users/me/event_types?has_name=false&page=2",
            Some(&HasName { has_name: true }),
        )
        .expect("merge");
        check!(url == "users/me/event_types?has_name=true&page=2");
    }

    #[test]
    fn fragment_is_kept() {
        let url = add_url_options("http://host/path#top", Some(&HasName { has_name: true }))
            .expect("merge");
        check!(url == "http://host/path?has_name=true#top");
    }

    #[test]
    fn serde_records_are_reflected() {
        let filter = Filter {
            include: Some("owner".to_string()),
            events: vec![
                "invitee.created".to_string(),
                "invitee.canceled".to_string(),
            ],
        };

        let url = add_url_options("hooks", Some(&SerdeQuery(&filter))).expect("merge");
        check!(url == "hooks?events=invitee.created&events=invitee.canceled&include=owner");
    }

    #[test]
    fn serde_zero_values_are_skipped() {
        let filter = Filter {
            include: None,
            events: Vec::new(),
        };
        check!(add_url_options("hooks", Some(&SerdeQuery(&filter))).expect("merge") == "hooks");
    }

    #[test]
    fn non_record_options_fail() {
        let_assert!(
            Err(Error::QuerySerialization(_)) = add_url_options("hooks", Some(&SerdeQuery(&7)))
        );
    }

    #[test]
    fn malformed_url_fails() {
        let_assert!(
            Err(Error::InvalidUrl(_)) =
                add_url_options("http://host:99999", Some(&HasName { has_name: true }))
        );
    }

    #[test]
    fn values_are_form_encoded() {
        let filter = Filter {
            include: Some("a b&c".to_string()),
            events: Vec::new(),
        };
        let url = add_url_options("hooks", Some(&SerdeQuery(&filter))).expect("merge");
        check!(url == "hooks?include=a+b%26c");
    }
}
