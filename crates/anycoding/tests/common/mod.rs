//! Hand-written shapes shared by the integration tests.
#![allow(dead_code)]

use anycoding::{decode_raw, encode_raw, Decode, Decoder, Encode, Encoder, RawValue, Result, Value};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use url::Url;

/// Parse a JSON literal into a tree.
pub fn tree(json: &str) -> Value {
    Value::from_json_str(json).unwrap()
}

// ============================================================================
// Flat scenario: bool, optional int, unicode text, sequence with a null
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub flag: bool,
    pub optional_int: Option<i64>,
    pub text: String,
    pub items: Vec<Option<i64>>,
}

impl Scenario {
    pub fn sample() -> Self {
        Scenario {
            flag: true,
            optional_int: None,
            text: "📀!".to_string(),
            items: vec![None, Some(1), Some(2)],
        }
    }
}

impl Encode for Scenario {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        let mut map = encoder.keyed_container()?;
        map.encode("bool", &self.flag)?;
        map.encode("optionalInt", &self.optional_int)?;
        map.encode("text", &self.text)?;
        map.encode("items", &self.items)
    }
}

impl Decode for Scenario {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let map = decoder.keyed_container()?;
        Ok(Scenario {
            flag: map.decode("bool")?,
            optional_int: map.decode("optionalInt")?,
            text: map.decode("text")?,
            items: map.decode("items")?,
        })
    }
}

// ============================================================================
// Raw-value enum
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Archived,
}

impl RawValue for Status {
    type Raw = String;

    fn raw_value(&self) -> String {
        match self {
            Status::Active => "active".to_string(),
            Status::Archived => "archived".to_string(),
        }
    }

    fn from_raw_value(raw: String) -> Option<Self> {
        match raw.as_str() {
            "active" => Some(Status::Active),
            "archived" => Some(Status::Archived),
            _ => None,
        }
    }

    fn first_case() -> Self {
        Status::Active
    }
}

impl Encode for Status {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encode_raw(self, encoder)
    }
}

impl Decode for Status {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        decode_raw(decoder)
    }
}

// ============================================================================
// Enum with associated data: {"circle": {"radius": 1.5}}
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { radius: f64 },
    Rect { width: f64, height: f64 },
}

impl Encode for Shape {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        let mut map = encoder.keyed_container()?;
        match self {
            Shape::Circle { radius } => {
                let mut fields = map.nested_keyed("circle")?;
                fields.encode("radius", radius)
            }
            Shape::Rect { width, height } => {
                let mut fields = map.nested_keyed("rect")?;
                fields.encode("width", width)?;
                fields.encode("height", height)
            }
        }
    }
}

impl Decode for Shape {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let map = decoder.keyed_container()?;
        if map.contains("circle") {
            let fields = map.nested_keyed("circle")?;
            return Ok(Shape::Circle {
                radius: fields.decode("radius")?,
            });
        }
        if map.contains("rect") {
            let fields = map.nested_keyed("rect")?;
            return Ok(Shape::Rect {
                width: fields.decode("width")?,
                height: fields.decode("height")?,
            });
        }
        Err(anycoding::Error::custom(map.path(), "unknown shape"))
    }
}

// ============================================================================
// Nested record using every wrapper
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub status: Status,
    pub joined: DateTime<Utc>,
    pub homepage: Url,
    pub shape: Shape,
    pub scores: BTreeMap<String, i64>,
    pub nickname: Option<String>,
    pub children: Vec<Profile>,
}

impl Profile {
    pub fn sample() -> Self {
        Profile {
            name: "Ada".to_string(),
            status: Status::Archived,
            joined: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            homepage: Url::parse("https://example.com/ada").unwrap(),
            shape: Shape::Rect {
                width: 2.0,
                height: 3.5,
            },
            scores: BTreeMap::from([("math".to_string(), 9), ("art".to_string(), 7)]),
            nickname: Some("countess".to_string()),
            children: vec![Profile {
                name: "Byron".to_string(),
                status: Status::Active,
                joined: DateTime::from_timestamp(1_700_000_100, 0).unwrap(),
                homepage: Url::parse("https://example.com/byron").unwrap(),
                shape: Shape::Circle { radius: 1.5 },
                scores: BTreeMap::new(),
                nickname: None,
                children: Vec::new(),
            }],
        }
    }
}

impl Encode for Profile {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        let mut map = encoder.keyed_container()?;
        map.encode("name", &self.name)?;
        map.encode("status", &self.status)?;
        map.encode("joined", &self.joined)?;
        map.encode("homepage", &self.homepage)?;
        map.encode("shape", &self.shape)?;
        map.encode("scores", &self.scores)?;
        map.encode_if_present("nickname", &self.nickname)?;
        map.encode("children", &self.children)
    }
}

impl Decode for Profile {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let map = decoder.keyed_container()?;
        Ok(Profile {
            name: map.decode("name")?,
            status: map.decode("status")?,
            joined: map.decode("joined")?,
            homepage: map.decode("homepage")?,
            shape: map.decode("shape")?,
            scores: map.decode("scores")?,
            nickname: map.decode_if_present("nickname")?,
            children: map.decode("children")?,
        })
    }
}

// ============================================================================
// Three levels deep: {"a": {"b": {"c": <int>}}}
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Outer {
    pub a: Middle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Middle {
    pub b: Inner,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inner {
    pub c: i64,
}

impl Decode for Outer {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let map = decoder.keyed_container()?;
        Ok(Outer { a: map.decode("a")? })
    }
}

impl Decode for Middle {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let map = decoder.keyed_container()?;
        Ok(Middle { b: map.decode("b")? })
    }
}

impl Decode for Inner {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let map = decoder.keyed_container()?;
        Ok(Inner { c: map.decode("c")? })
    }
}

impl Encode for Outer {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.keyed_container()?.encode("a", &self.a)
    }
}

impl Encode for Middle {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.keyed_container()?.encode("b", &self.b)
    }
}

impl Encode for Inner {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.keyed_container()?.encode("c", &self.c)
    }
}
