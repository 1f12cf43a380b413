use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{ChartId, UpdateToken};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// What a series needs from the chart driving it.
pub trait ChartContext {
    fn chart_id(&self) -> ChartId;

    /// Token of the current update pass.
    fn update_token(&self) -> UpdateToken;

    /// Draws the next color of the chart's rotation.
    fn next_color(&mut self) -> Color;
}

/// Round-robin color rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    colors: Vec<Color>,
    #[serde(default)]
    cursor: usize,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: vec![
                Color::from_rgb8(33, 150, 243),
                Color::from_rgb8(244, 67, 54),
                Color::from_rgb8(76, 175, 80),
                Color::from_rgb8(255, 152, 0),
                Color::from_rgb8(156, 39, 176),
                Color::from_rgb8(0, 188, 212),
                Color::from_rgb8(255, 235, 59),
                Color::from_rgb8(121, 85, 72),
                Color::from_rgb8(96, 125, 139),
                Color::from_rgb8(233, 30, 99),
            ],
            cursor: 0,
        }
    }
}

impl ColorPalette {
    pub fn new(colors: Vec<Color>) -> ChartResult<Self> {
        if colors.is_empty() {
            return Err(ChartError::InvalidData(
                "color palette must not be empty".to_owned(),
            ));
        }
        for color in &colors {
            color.validate()?;
        }
        Ok(Self { colors, cursor: 0 })
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn next_color(&mut self) -> Color {
        // A deserialized palette may be empty.
        if self.colors.is_empty() {
            return Color::rgb(0.0, 0.0, 0.0);
        }
        let color = self.colors[self.cursor % self.colors.len()];
        self.cursor = (self.cursor + 1) % self.colors.len();
        color
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.colors.is_empty() {
            return Err(ChartError::InvalidData(
                "color palette must not be empty".to_owned(),
            ));
        }
        self.colors.iter().copied().try_for_each(Color::validate)
    }

    /// Restarts the rotation at the first color.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

/// Minimal [`ChartContext`]: an id, a token advanced per pass, and a palette.
#[derive(Debug, Clone)]
pub struct ChartState {
    id: ChartId,
    token: UpdateToken,
    palette: ColorPalette,
}

impl Default for ChartState {
    fn default() -> Self {
        Self::new(ColorPalette::default())
    }
}

impl ChartState {
    #[must_use]
    pub fn new(palette: ColorPalette) -> Self {
        Self {
            id: ChartId::next(),
            token: UpdateToken::new(0),
            palette,
        }
    }

    /// Starts a new logical update pass.
    pub fn begin_update_pass(&mut self) -> UpdateToken {
        self.token = self.token.advanced();
        trace!(chart = ?self.id, token = ?self.token, "begin update pass");
        self.token
    }

    #[must_use]
    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }
}

impl ChartContext for ChartState {
    fn chart_id(&self) -> ChartId {
        self.id
    }

    fn update_token(&self) -> UpdateToken {
        self.token
    }

    fn next_color(&mut self) -> Color {
        self.palette.next_color()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartContext, ChartState, ColorPalette};
    use crate::render::Color;

    #[test]
    fn palette_round_robins() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        let blue = Color::rgb(0.0, 0.0, 1.0);
        let mut palette = ColorPalette::new(vec![red, blue]).expect("palette");
        assert_eq!(palette.next_color(), red);
        assert_eq!(palette.next_color(), blue);
        assert_eq!(palette.next_color(), red);
    }

    #[test]
    fn empty_palette_is_rejected() {
        assert!(ColorPalette::new(Vec::new()).is_err());
    }

    #[test]
    fn each_pass_gets_a_distinct_token() {
        let mut state = ChartState::default();
        let first = state.begin_update_pass();
        let second = state.begin_update_pass();
        assert_ne!(first, second);
        assert_eq!(state.update_token(), second);
    }
}
