//! Request description consumed by the executor.

use std::fmt;

use reqwest::Method;
use serde::Serialize;

use pbase_core::error::InvalidInputError;
use pbase_core::{AuthToken, Result};

/// One HTTP request, before the base URL and transport are applied.
///
/// The path is a template such as `/api/collections/{collection}/records/{id}`;
/// placeholders are replaced verbatim by [`with_param`](Self::with_param)
/// values, so callers pass path-safe strings.
#[derive(Clone)]
pub struct RequestSpec<'a> {
    method: Method,
    template: &'a str,
    path_params: Vec<(&'a str, &'a str)>,
    query: Vec<(&'static str, String)>,
    body: Option<Vec<u8>>,
    token: Option<AuthToken>,
    sensitive: bool,
}

impl<'a> RequestSpec<'a> {
    pub fn new(method: Method, template: &'a str) -> Self {
        Self {
            method,
            template,
            path_params: Vec::new(),
            query: Vec::new(),
            body: None,
            token: None,
            sensitive: false,
        }
    }

    pub fn get(template: &'a str) -> Self {
        Self::new(Method::GET, template)
    }

    pub fn post(template: &'a str) -> Self {
        Self::new(Method::POST, template)
    }

    pub fn patch(template: &'a str) -> Self {
        Self::new(Method::PATCH, template)
    }

    pub fn delete(template: &'a str) -> Self {
        Self::new(Method::DELETE, template)
    }

    /// Bind a `{name}` placeholder.
    pub fn with_param(mut self, name: &'a str, value: &'a str) -> Self {
        self.path_params.push((name, value));
        self
    }

    /// Append query pairs. Callers filter out unspecified values.
    pub fn with_query(mut self, pairs: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Serialize `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::Body`] if the value can't be serialized.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(|e| InvalidInputError::Body {
            reason: e.to_string(),
        })?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Attach a bearer token, if any.
    pub fn with_token(mut self, token: Option<AuthToken>) -> Self {
        self.token = token;
        self
    }

    /// Keep request and response bodies out of debug logs.
    ///
    /// Set for auth endpoints, whose bodies carry passwords and tokens.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn query(&self) -> &[(&'static str, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// Substitute every `{name}` in the template.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::PathTemplate`] for a placeholder with no
    /// bound value.
    pub fn resolve_path(&self) -> Result<String> {
        let mut path = String::with_capacity(self.template.len() + 32);
        let mut rest = self.template;

        while let Some(open) = rest.find('{') {
            path.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| InvalidInputError::PathTemplate {
                template: self.template.to_string(),
                name: after.to_string(),
            })?;
            let name = &after[..close];

            let value = self
                .path_params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| InvalidInputError::PathTemplate {
                    template: self.template.to_string(),
                    name: name.to_string(),
                })?;

            path.push_str(value);
            rest = &after[close + 1..];
        }

        path.push_str(rest);
        Ok(path)
    }
}

impl fmt::Debug for RequestSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSpec")
            .field("method", &self.method)
            .field("template", &self.template)
            .field("path_params", &self.path_params)
            .field("query", &self.query)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .field("token", &self.token)
            .field("sensitive", &self.sensitive)
            .finish()
    }
}
