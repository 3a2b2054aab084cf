//! Named raw resources bundled with the application.

use crate::error::Error;
use serde::Deserialize;

pub trait Resources {
    fn get(&self, name: &str) -> Option<&[u8]>;
}

pub struct Resource<'a> {
    name: &'a str,
    data: &'a [u8],
}

impl<'a> Resource<'a> {
    pub const fn new(name: &'a str, data: &'a [u8]) -> Self {
        Self { name, data }
    }
}

/// Fixed lookup table of resources.
pub struct StaticResources<'a, const N: usize> {
    entries: &'a [Resource<'a>; N],
}

impl<'a, const N: usize> StaticResources<'a, N> {
    pub const fn new(entries: &'a [Resource<'a>; N]) -> Self {
        Self { entries }
    }
}

impl<'a, const N: usize> Resources for StaticResources<'a, N> {
    fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.data)
    }
}

/// Credentials for the cloud publisher, borrowed from a JSON resource.
///
/// Only `access_token` is required. Unknown fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Credentials<'a> {
    pub access_token: &'a str,
    #[serde(default, borrow)]
    pub project_id: Option<&'a str>,
}

impl<'a> Credentials<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self, Error> {
        let (credentials, _) =
            serde_json_core::from_slice::<Credentials<'a>>(data).map_err(|_| Error::Credentials)?;
        if credentials.access_token.is_empty() {
            return Err(Error::Credentials);
        }
        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static ENTRIES: [Resource<'static>; 2] = [
        Resource::new("credentials", br#"{"access_token":"abc","project_id":"proj"}"#),
        Resource::new("empty", b""),
    ];

    #[test]
    fn test_lookup() {
        let resources = StaticResources::new(&ENTRIES);
        assert!(resources.get("credentials").is_some());
        assert_eq!(Some(&b""[..]), resources.get("empty"));
        assert!(resources.get("missing").is_none());
    }

    #[test]
    fn test_parse_credentials() {
        let resources = StaticResources::new(&ENTRIES);
        let credentials = Credentials::parse(resources.get("credentials").unwrap()).unwrap();
        assert_eq!("abc", credentials.access_token);
        assert_eq!(Some("proj"), credentials.project_id);
    }

    #[test]
    fn test_parse_without_project() {
        let credentials =
            Credentials::parse(br#"{"type":"token","access_token":"xyz"}"#).unwrap();
        assert_eq!("xyz", credentials.access_token);
        assert_eq!(None, credentials.project_id);
    }

    #[test]
    fn test_reject_invalid_credentials() {
        assert_eq!(Err(Error::Credentials), Credentials::parse(b""));
        assert_eq!(Err(Error::Credentials), Credentials::parse(b"not json"));
        assert_eq!(
            Err(Error::Credentials),
            Credentials::parse(br#"{"access_token":""}"#)
        );
        assert_eq!(
            Err(Error::Credentials),
            Credentials::parse(br#"{"project_id":"p"}"#)
        );
    }
}
