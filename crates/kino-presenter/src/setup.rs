//! Runtime setup configuration
//!
//! The object handed to the player runtime is assembled from typed layers,
//! merged shallowly in a fixed order. Later layers win:
//!
//! 1. presentation defaults (size, aspect ratio, chrome)
//! 2. playback defaults (autostart, volume, mute)
//! 3. named skin
//! 4. caller theme
//! 5. media metadata (title, description, image, extra keys)
//! 6. technical fields (source, renderer, control-bar allow-list, features)
//! 7. logo

use crate::{config::LogoOptions, Error, PlaybackMetadata, PresenterConfig, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Stream type passed to the runtime
pub const STREAM_TYPE: &str = "hls";

/// Control-bar elements the runtime may render; rewind/forward are left out
pub const CONTROLBAR_ELEMENTS: [&str; 5] = ["play", "progress", "duration", "volume", "fullscreen"];

/// Initial volume requested at setup
pub const INITIAL_VOLUME: u8 = 100;

#[derive(Serialize)]
struct PresentationLayer<'a> {
    width: &'a str,
    height: &'a str,
    aspectratio: &'a str,
    controls: bool,
    sharing: bool,
    displaytitle: bool,
    displaydescription: bool,
    abouttext: &'a str,
    aboutlink: &'a str,
}

#[derive(Serialize)]
struct PlaybackLayer {
    autostart: bool,
    mute: bool,
    volume: u8,
    startmuted: bool,
}

#[derive(Serialize)]
struct SkinLayer<'a> {
    skin: SkinRef<'a>,
}

#[derive(Serialize)]
struct SkinRef<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct ControlBarLayout {
    elements: [&'static str; 5],
}

#[derive(Serialize)]
struct FeatureFlags {
    rewind: bool,
    forward: bool,
}

#[derive(Serialize)]
struct TechnicalLayer<'a> {
    stretching: &'a str,
    primary: &'a str,
    hlshtml: bool,
    preload: &'a str,
    file: &'a str,
    #[serde(rename = "type")]
    stream_type: &'a str,
    controlbar: ControlBarLayout,
    features: FeatureFlags,
}

#[derive(Serialize)]
struct BrandingLayer<'a> {
    logo: &'a LogoOptions,
}

/// Merged setup object, serialized as a flat JSON object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SetupConfig(Map<String, Value>);

impl SetupConfig {
    /// Build the setup object for a proxied stream
    pub fn build(
        config: &PresenterConfig,
        proxy_url: &str,
        metadata: Option<&PlaybackMetadata>,
    ) -> Result<Self> {
        let mut merged = Map::new();

        merge_layer(&mut merged, &PresentationLayer {
            width: "100%",
            height: "100%",
            aspectratio: "16:9",
            controls: true,
            sharing: true,
            displaytitle: true,
            displaydescription: true,
            abouttext: &config.about_text,
            aboutlink: &config.about_link,
        })?;

        merge_layer(&mut merged, &PlaybackLayer {
            autostart: true,
            mute: false,
            volume: INITIAL_VOLUME,
            startmuted: false,
        })?;

        if let Some(name) = config.skin.name() {
            merge_layer(&mut merged, &SkinLayer { skin: SkinRef { name } })?;
        }

        merge_layer(&mut merged, &config.theme)?;

        // Before the technical layer so metadata cannot replace the source
        if let Some(metadata) = metadata {
            merge_layer(&mut merged, metadata)?;
        }

        merge_layer(&mut merged, &TechnicalLayer {
            stretching: "uniform",
            primary: "html5",
            hlshtml: true,
            preload: "auto",
            file: proxy_url,
            stream_type: STREAM_TYPE,
            controlbar: ControlBarLayout { elements: CONTROLBAR_ELEMENTS },
            features: FeatureFlags { rewind: false, forward: false },
        })?;

        merge_layer(&mut merged, &BrandingLayer { logo: &config.logo })?;

        Ok(Self(merged))
    }

    /// Proxied media URL
    pub fn file(&self) -> Option<&str> {
        self.0.get("file").and_then(Value::as_str)
    }

    /// Stream type (`hls`)
    pub fn stream_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Export as JSON for JS interop
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

/// Shallow merge: each top-level key of `layer` replaces the one in `target`
fn merge_layer<T: Serialize>(target: &mut Map<String, Value>, layer: &T) -> Result<()> {
    match serde_json::to_value(layer)? {
        Value::Object(fields) => {
            target.extend(fields);
            Ok(())
        }
        other => Err(Error::InvalidConfig(format!(
            "setup layer must be an object, got {other}"
        ))),
    }
}
