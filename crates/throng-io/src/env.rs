//! Environment descriptor parsing.
//!
//! Two descriptor shapes exist. Synthetic scenario exports carry the
//! ground-truth weight profile and an object list under
//! `ParametersGrid` / `EnvironmentGrid`; field recordings carry an
//! object list and the tracked area extents under `EnvironmentObjects`
//! / `EnvironmentParams`. Numeric fields may arrive as JSON numbers or
//! as quoted strings; both parse.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use throng_core::{Position, WeightProfile};
use throng_raster::EnvObject;

use crate::error::ReadError;

/// Accept a JSON number or a numeric string.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(v) => Ok(v),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("bad numeric string {s:?}: {e}"))),
    }
}

#[derive(Debug, Deserialize)]
struct EnvObjectDoc {
    #[serde(deserialize_with = "lenient_f64")]
    pos_x: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pos_z: f64,
    #[serde(deserialize_with = "lenient_f64")]
    scale_x: f64,
    #[serde(deserialize_with = "lenient_f64")]
    scale_z: f64,
    #[serde(rename = "type", deserialize_with = "lenient_f64")]
    kind: f64,
}

impl From<EnvObjectDoc> for EnvObject {
    fn from(doc: EnvObjectDoc) -> Self {
        EnvObject {
            center: Position::new(doc.pos_x, doc.pos_z),
            scale_x: doc.scale_x,
            scale_z: doc.scale_z,
            value: doc.kind,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WeightsDoc {
    #[serde(deserialize_with = "lenient_f64")]
    goal: f64,
    #[serde(deserialize_with = "lenient_f64")]
    group: f64,
    #[serde(deserialize_with = "lenient_f64")]
    interaction: f64,
    #[serde(deserialize_with = "lenient_f64")]
    interconn: f64,
}

#[derive(Debug, Deserialize)]
struct SyntheticEnvDoc {
    #[serde(rename = "ParametersGrid")]
    parameters: Vec<WeightsDoc>,
    #[serde(rename = "EnvironmentGrid")]
    objects: Vec<EnvObjectDoc>,
}

/// Read a synthetic scenario descriptor: the ground-truth weight
/// profile plus the environment objects.
pub fn read_synthetic_env(path: &Path) -> Result<(WeightProfile, Vec<EnvObject>), ReadError> {
    let display = path.display().to_string();
    let reader = BufReader::new(File::open(path)?);
    let doc: SyntheticEnvDoc =
        serde_json::from_reader(reader).map_err(|source| ReadError::MalformedDescriptor {
            path: display.clone(),
            source,
        })?;

    let weights = doc
        .parameters
        .first()
        .ok_or_else(|| ReadError::InvalidDescriptor {
            path: display,
            detail: "ParametersGrid is empty".to_string(),
        })?;
    let profile = WeightProfile::new(
        weights.goal,
        weights.group,
        weights.interaction,
        weights.interconn,
    );
    Ok((profile, doc.objects.into_iter().map(Into::into).collect()))
}

/// Spatial extents of a tracked field area, in raw capture units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvExtent {
    /// Minimum x coordinate.
    pub min_x: f64,
    /// Maximum x coordinate.
    pub max_x: f64,
    /// Minimum z coordinate.
    pub min_z: f64,
    /// Maximum z coordinate.
    pub max_z: f64,
}

impl EnvExtent {
    /// Width of the tracked area.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the tracked area.
    pub fn height(&self) -> f64 {
        self.max_z - self.min_z
    }
}

#[derive(Debug, Deserialize)]
struct FieldParamsDoc {
    #[serde(deserialize_with = "lenient_f64")]
    min_width: f64,
    #[serde(deserialize_with = "lenient_f64")]
    max_width: f64,
    #[serde(deserialize_with = "lenient_f64")]
    min_height: f64,
    #[serde(deserialize_with = "lenient_f64")]
    max_height: f64,
}

#[derive(Debug, Deserialize)]
struct FieldEnvDoc {
    #[serde(rename = "EnvironmentObjects")]
    objects: Vec<EnvObjectDoc>,
    #[serde(rename = "EnvironmentParams")]
    params: FieldParamsDoc,
}

/// A parsed field-recording environment descriptor.
#[derive(Clone, Debug)]
pub struct FieldEnvironment {
    /// Environment objects, in unit coordinates.
    pub objects: Vec<EnvObject>,
    /// Tracked area extents, in raw capture units.
    pub extent: EnvExtent,
}

/// Read a field-recording environment descriptor.
pub fn read_field_env(path: &Path) -> Result<FieldEnvironment, ReadError> {
    let display = path.display().to_string();
    let reader = BufReader::new(File::open(path)?);
    let doc: FieldEnvDoc =
        serde_json::from_reader(reader).map_err(|source| ReadError::MalformedDescriptor {
            path: display.clone(),
            source,
        })?;

    let extent = EnvExtent {
        min_x: doc.params.min_width,
        max_x: doc.params.max_width,
        min_z: doc.params.min_height,
        max_z: doc.params.max_height,
    };
    if extent.width() <= 0.0 || extent.height() <= 0.0 {
        return Err(ReadError::InvalidDescriptor {
            path: display,
            detail: format!(
                "degenerate extents: width {}, height {}",
                extent.width(),
                extent.height()
            ),
        });
    }
    Ok(FieldEnvironment {
        objects: doc.objects.into_iter().map(Into::into).collect(),
        extent,
    })
}
