use image::Rgb;

/// One row of a render log: the color of every LED at one point in time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    index: usize,
    colors: Vec<Rgb<u8>>,
}

impl Frame {
    /// Create a frame from already parsed colors
    pub fn new(index: usize, colors: Vec<Rgb<u8>>) -> Self {
        Self { index, colors }
    }

    /// Parse `num_leds` color triples from the leading fields of a row.
    ///
    /// Fields past `3 * num_leds` are ignored. Returns a short description of
    /// the problem on failure so the caller can attach file and line context.
    pub fn parse<'a, I>(index: usize, fields: I, num_leds: usize) -> std::result::Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut colors = Vec::with_capacity(num_leds);
        let mut fields = fields.into_iter();
        let mut channel = [0u8; 3];

        for led in 0..num_leds {
            for (c, value) in channel.iter_mut().enumerate() {
                let field = fields.next().ok_or_else(|| {
                    format!(
                        "expected {} fields for {} LEDs, found {}",
                        num_leds * 3,
                        num_leds,
                        led * 3 + c
                    )
                })?;
                *value = field
                    .parse::<u8>()
                    .map_err(|_| format!("field {} ({:?}) is not an integer in 0-255", led * 3 + c, field))?;
            }
            colors.push(Rgb(channel));
        }

        Ok(Self { index, colors })
    }

    /// Render order of this frame within its file
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn colors(&self) -> &[Rgb<u8>] {
        &self.colors
    }

    /// Number of LEDs in the frame
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Iterate `(led_index, color)` pairs
    pub fn leds(&self) -> impl Iterator<Item = (usize, Rgb<u8>)> + '_ {
        self.colors.iter().copied().enumerate()
    }
}
