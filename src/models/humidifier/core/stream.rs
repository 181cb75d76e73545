use serde::{Deserialize, Serialize};

/// One of the two gas streams of a membrane humidifier.
///
/// The dry stream is humidified; the wet stream gives up moisture and heat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Dry,
    Wet,
}

impl Stream {
    /// Both streams, dry first.
    pub const ALL: [Stream; 2] = [Stream::Dry, Stream::Wet];
}

/// A value held once for each stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerStream<T> {
    /// Value for the dry (humidified) stream.
    pub dry: T,

    /// Value for the wet (moisture-giving) stream.
    pub wet: T,
}

impl<T> PerStream<T> {
    /// Pairs a dry and a wet value.
    pub const fn new(dry: T, wet: T) -> Self {
        Self { dry, wet }
    }

    /// Returns the value for `stream`.
    pub fn get(&self, stream: Stream) -> &T {
        match stream {
            Stream::Dry => &self.dry,
            Stream::Wet => &self.wet,
        }
    }

    /// Returns the value for `stream` mutably.
    pub fn get_mut(&mut self, stream: Stream) -> &mut T {
        match stream {
            Stream::Dry => &mut self.dry,
            Stream::Wet => &mut self.wet,
        }
    }

    /// Applies `f` to both values, dry first.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PerStream<U> {
        let dry = f(self.dry);
        let wet = f(self.wet);
        PerStream::new(dry, wet)
    }
}
