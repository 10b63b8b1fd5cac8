//! Serialization and deserialization for interoperability.
//!
//! Curve parameters and points are mirrored into plain serde structures
//! whose numeric fields are strings in a chosen radix (base 10, base 16
//! or base64), so they survive JSON round-trips across implementations
//! that disagree about integer width.

use crate::bigint::BigUint;
use crate::curve::{CoordinateSystem, Curve, FieldSpec};
use crate::point::Point;
use base64::Engine;
use serde::{Deserialize, Serialize};

// ==================== Serialization Format ====================

/// Radix used for the numeric fields of the serializable mirrors.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerializationFormat {
    #[serde(rename = "base10")]
    #[default]
    Base10,
    #[serde(rename = "base16")]
    Base16,
    #[serde(rename = "base64")]
    Base64,
}

impl SerializationFormat {
    /// Renders an integer in this format.
    pub fn encode(&self, value: &BigUint) -> String {
        match self {
            SerializationFormat::Base10 => value.to_string(),
            SerializationFormat::Base16 => value.to_hex(),
            SerializationFormat::Base64 => {
                base64::engine::general_purpose::STANDARD.encode(value.to_bytes_be())
            }
        }
    }

    /// Parses an integer in this format.
    pub fn decode(&self, s: &str) -> Result<BigUint, String> {
        match self {
            SerializationFormat::Base10 => BigUint::from_decimal(s),
            SerializationFormat::Base16 => BigUint::from_hex(s),
            SerializationFormat::Base64 => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(s)
                    .map_err(|e| format!("base64 decode error: {}", e))?;
                Ok(BigUint::from_bytes_be(&bytes))
            }
        }
    }
}

// ==================== Hex helpers ====================

pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, String> {
    if s.len() % 2 != 0 {
        return Err("hex string has odd length".to_string());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| format!("invalid hex byte: {}", e))
        })
        .collect()
}

// ==================== Curve Serialization ====================

/// Serializable mirror of a [`Curve`], tagged by field family.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "field")]
pub enum SerializableCurve {
    #[serde(rename = "prime")]
    Prime {
        modulus: String,
        a: String,
        b: String,
        order: Option<String>,
        cofactor: Option<String>,
        coordinates: String,
        #[serde(default)]
        format: SerializationFormat,
    },
    #[serde(rename = "binary")]
    Binary {
        m: u32,
        irreducible: String,
        a: String,
        b: String,
        order: Option<String>,
        cofactor: Option<String>,
        coordinates: String,
        #[serde(default)]
        format: SerializationFormat,
    },
}

impl SerializableCurve {
    pub fn from_curve(curve: &Curve, format: SerializationFormat) -> Self {
        let order = curve.order().map(|n| format.encode(n));
        let cofactor = curve.cofactor().map(|h| format.encode(h));
        let coordinates = curve.coordinate_system().name().to_string();
        match curve.field() {
            FieldSpec::Prime { modulus } => SerializableCurve::Prime {
                modulus: format.encode(modulus),
                a: format.encode(&curve.a().to_biguint()),
                b: format.encode(&curve.b().to_biguint()),
                order,
                cofactor,
                coordinates,
                format,
            },
            FieldSpec::Binary { m, irreducible } => SerializableCurve::Binary {
                m: *m,
                irreducible: format.encode(irreducible),
                a: format.encode(&curve.a().to_biguint()),
                b: format.encode(&curve.b().to_biguint()),
                order,
                cofactor,
                coordinates,
                format,
            },
        }
    }

    pub fn to_curve(&self) -> Result<Curve, String> {
        match self {
            SerializableCurve::Prime {
                modulus,
                a,
                b,
                order,
                cofactor,
                coordinates,
                format,
            } => {
                let coord = CoordinateSystem::from_name(coordinates)
                    .ok_or_else(|| format!("unknown coordinate system '{}'", coordinates))?;
                Curve::new_prime(
                    format.decode(modulus)?,
                    format.decode(a)?,
                    format.decode(b)?,
                    order.as_deref().map(|n| format.decode(n)).transpose()?,
                    cofactor.as_deref().map(|h| format.decode(h)).transpose()?,
                    coord,
                )
                .map_err(|e| e.to_string())
            }
            SerializableCurve::Binary {
                m,
                irreducible,
                a,
                b,
                order,
                cofactor,
                coordinates,
                format,
            } => {
                let coord = CoordinateSystem::from_name(coordinates)
                    .ok_or_else(|| format!("unknown coordinate system '{}'", coordinates))?;
                Curve::new_binary(
                    *m,
                    format.decode(irreducible)?,
                    format.decode(a)?,
                    format.decode(b)?,
                    order.as_deref().map(|n| format.decode(n)).transpose()?,
                    cofactor.as_deref().map(|h| format.decode(h)).transpose()?,
                    coord,
                )
                .map_err(|e| e.to_string())
            }
        }
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("JSON serialization error: {}", e))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("JSON deserialization error: {}", e))
    }
}

// ==================== Point Serialization ====================

/// Serializable mirror of a [`Point`], always in affine coordinates.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum SerializablePoint {
    #[serde(rename = "infinity")]
    Infinity {
        #[serde(default)]
        format: SerializationFormat,
    },
    #[serde(rename = "point")]
    Point {
        x: String,
        y: String,
        #[serde(default)]
        format: SerializationFormat,
    },
}

impl SerializablePoint {
    /// Normalizes the point and captures its affine coordinates.
    pub fn from_point(point: &Point, format: SerializationFormat) -> Self {
        if point.is_infinity() {
            return SerializablePoint::Infinity { format };
        }
        let n = point.normalize();
        let x = n
            .x_coord()
            .expect("normalized non-infinity point has coordinates")
            .to_biguint();
        let y = n
            .y_coord()
            .expect("normalized non-infinity point has coordinates")
            .to_biguint();
        SerializablePoint::Point {
            x: format.encode(&x),
            y: format.encode(&y),
            format,
        }
    }

    /// Reconstructs the point on the given curve, revalidating the curve
    /// equation.
    pub fn to_point(&self, curve: &Curve) -> Result<Point, String> {
        match self {
            SerializablePoint::Infinity { .. } => Ok(curve.infinity()),
            SerializablePoint::Point { x, y, format } => {
                let x = format.decode(x)?;
                let y = format.decode(y)?;
                curve.create_point(&x, &y).map_err(|e| e.to_string())
            }
        }
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("JSON serialization error: {}", e))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("JSON deserialization error: {}", e))
    }
}

// ==================== SEC1 text helpers ====================

/// SEC1 encoding as lowercase hex.
pub fn point_to_sec1_hex(point: &Point, compressed: bool) -> String {
    bytes_to_hex(&point.get_encoded(compressed))
}

/// Parses a SEC1 hex string on the given curve.
pub fn point_from_sec1_hex(curve: &Curve, s: &str) -> Result<Point, String> {
    let bytes = hex_to_bytes(s)?;
    curve.decode_point(&bytes).map_err(|e| e.to_string())
}
