//! HTTP request/response values passed between the engine, the transport and
//! the fixture codec.
//!
//! Header, method, status and version types are the `http` types re-exported
//! by `reqwest`, so a live response converts without copying its metadata.

use crate::errors::VcrError;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Version};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Cursor, Read};
use url::Url;

// ── Request ───────────────────────────────────────────────────────────────────

/// Request body. A `Reader` body can only be consumed once; the engine buffers
/// it before hashing so the same bytes are both fingerprinted and sent.
#[derive(Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Buffered(Bytes),
    Reader(Box<dyn Read + Send>),
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Buffered(bytes) => write!(f, "Buffered({} bytes)", bytes.len()),
            Self::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

#[derive(Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, url: &str) -> Result<Self, VcrError> {
        let url = Url::parse(url).map_err(|e| VcrError::Encoding(format!("{url}: {e}")))?;
        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        })
    }

    pub fn get(url: &str) -> Result<Self, VcrError> {
        Self::new(Method::GET, url)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = RequestBody::Buffered(body.into());
        self
    }

    pub fn with_reader(mut self, reader: impl Read + Send + 'static) -> Self {
        self.body = RequestBody::Reader(Box::new(reader));
        self
    }

    /// Drain a streaming body into memory so it can be read more than once.
    pub fn buffer_body(&mut self) -> Result<(), VcrError> {
        if let RequestBody::Reader(reader) = &mut self.body {
            let mut buf = Vec::new();
            reader
                .read_to_end(&mut buf)
                .map_err(|e| VcrError::Encoding(format!("request body: {e}")))?;
            self.body = RequestBody::Buffered(Bytes::from(buf));
        }
        Ok(())
    }

    /// Body bytes, `None` when there is no body. Fails for an unbuffered reader.
    pub fn body_bytes(&self) -> Result<Option<&Bytes>, VcrError> {
        match &self.body {
            RequestBody::Empty => Ok(None),
            RequestBody::Buffered(bytes) => Ok(Some(bytes)),
            RequestBody::Reader(_) => Err(VcrError::Encoding(
                "request body has not been buffered".to_string(),
            )),
        }
    }
}

// ── Form fields ───────────────────────────────────────────────────────────────

/// Form fields keyed by name; a name may carry several values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every value of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.insert(key.into(), vec![value.into()]);
        self
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.entry(key.into()).or_default().push(value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `application/x-www-form-urlencoded` rendering, keys sorted.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.fields {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut fields = Self::new();
        for (key, value) in iter {
            fields.add(key, value);
        }
        fields
    }
}

// ── Response ──────────────────────────────────────────────────────────────────

/// Response body, readable as a stream in both the live and replayed case.
pub enum ResponseBody {
    Buffered(Cursor<Bytes>),
    Streaming(Box<dyn Read + Send>),
}

impl ResponseBody {
    pub fn empty() -> Self {
        Self::Buffered(Cursor::new(Bytes::new()))
    }

    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::Buffered(Cursor::new(bytes.into()))
    }
}

impl Read for ResponseBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Buffered(cursor) => cursor.read(buf),
            Self::Streaming(reader) => reader.read(buf),
        }
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered(cursor) => write!(f, "Buffered({} bytes)", cursor.get_ref().len()),
            Self::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: ResponseBody::from_bytes(body),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Pull a streaming body fully into memory and return its complete bytes.
    ///
    /// Bytes already read from a buffered body are still included, and the
    /// read position is left untouched so the caller sees the body intact.
    pub fn buffer_body(&mut self) -> io::Result<Bytes> {
        if let ResponseBody::Streaming(reader) = &mut self.body {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf)?;
            self.body = ResponseBody::from_bytes(buf);
        }
        match &self.body {
            ResponseBody::Buffered(cursor) => Ok(cursor.get_ref().clone()),
            ResponseBody::Streaming(_) => Ok(Bytes::new()),
        }
    }

    /// Read the remaining body.
    pub fn bytes(mut self) -> io::Result<Bytes> {
        let mut buf = Vec::new();
        self.body.read_to_end(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    pub fn text(self) -> io::Result<String> {
        let bytes = self.bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
