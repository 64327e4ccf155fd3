//! What a backend can do, declared up front.
//!
//! The registry consults these flags before handing an [`Image`](crate::Image)
//! to a codec, so a decode-only backend fails a save with a clear error
//! instead of inside the codec.

/// Static feature flags of one backend.
///
/// Backends build these in `const` context and return them from
/// [`ImageCodec::capabilities`](crate::ImageCodec::capabilities):
///
/// ```
/// use rasterbuf::CodecCapabilities;
///
/// static PNG_LIKE: CodecCapabilities = CodecCapabilities::new()
///     .with_decode(true)
///     .with_encode(true)
///     .with_lossless(true)
///     .with_alpha(true);
///
/// assert!(PNG_LIKE.round_trips_exactly());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct CodecCapabilities {
    decode: bool,
    encode: bool,
    lossy: bool,
    lossless: bool,
    alpha: bool,
    quality: bool,
}

impl CodecCapabilities {
    /// No capabilities.
    pub const fn new() -> Self {
        Self {
            decode: false,
            encode: false,
            lossy: false,
            lossless: false,
            alpha: false,
            quality: false,
        }
    }

    /// Whether the codec can decode files into an [`Image`](crate::Image).
    pub const fn decode(&self) -> bool {
        self.decode
    }

    /// Whether the codec can encode an [`Image`](crate::Image).
    pub const fn encode(&self) -> bool {
        self.encode
    }

    /// Whether encoding discards information.
    pub const fn lossy(&self) -> bool {
        self.lossy
    }

    /// Whether an encode/decode round trip reproduces RGBA8 pixels exactly.
    pub const fn lossless(&self) -> bool {
        self.lossless
    }

    /// Whether the alpha channel survives encoding.
    pub const fn alpha(&self) -> bool {
        self.alpha
    }

    /// Whether the encoder takes a numeric quality setting.
    pub const fn quality(&self) -> bool {
        self.quality
    }

    /// Decode and encode with pixels reproduced bit for bit.
    pub const fn round_trips_exactly(&self) -> bool {
        self.decode && self.encode && self.lossless
    }

    pub const fn with_decode(mut self, v: bool) -> Self {
        self.decode = v;
        self
    }

    pub const fn with_encode(mut self, v: bool) -> Self {
        self.encode = v;
        self
    }

    pub const fn with_lossy(mut self, v: bool) -> Self {
        self.lossy = v;
        self
    }

    pub const fn with_lossless(mut self, v: bool) -> Self {
        self.lossless = v;
        self
    }

    pub const fn with_alpha(mut self, v: bool) -> Self {
        self.alpha = v;
        self
    }

    pub const fn with_quality(mut self, v: bool) -> Self {
        self.quality = v;
        self
    }
}
