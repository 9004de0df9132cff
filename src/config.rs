/// Decoding options.
///
/// ```
/// use cbor_codec::Config;
///
/// let lenient = Config::default().ignore_unknown_keys(true);
/// assert!(lenient.ignores_unknown_keys());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    ignore_unknown_keys: bool,
    max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ignore_unknown_keys: false,
            max_depth: 256,
        }
    }
}

impl Config {
    /// Skip values of map keys the target type does not declare instead of
    /// failing with [`CborError::UnknownKey`](crate::CborError::UnknownKey).
    pub fn ignore_unknown_keys(mut self, ignore: bool) -> Self {
        self.ignore_unknown_keys = ignore;
        self
    }

    /// Maximum nesting of arrays, maps and tags accepted while decoding.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn ignores_unknown_keys(&self) -> bool {
        self.ignore_unknown_keys
    }

    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }
}
