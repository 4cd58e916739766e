use glam::{ivec2, IVec2};

/// Character grid read from a text block such as an indented raw string
/// literal in a test.
///
/// Blank leading lines, trailing whitespace and indentation shared by every
/// line are stripped so that the top left corner of the content sits at the
/// origin.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct AsciiMap {
    lines: Vec<String>,
}

impl AsciiMap {
    pub fn new(map: &str) -> Self {
        let map = map.trim_end();

        let mut y_skip = 0;
        let mut x_skip = usize::MAX;

        for line in map.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                // Only blank lines before the content are skipped.
                if x_skip == usize::MAX {
                    y_skip += 1;
                }
                continue;
            }

            x_skip = x_skip
                .min(line.chars().take_while(|c| c.is_whitespace()).count());
        }

        if x_skip == usize::MAX {
            return Default::default();
        }

        let lines = map
            .lines()
            .skip(y_skip)
            .map(|line| line.trim_end().chars().skip(x_skip).collect())
            .collect();

        AsciiMap { lines }
    }

    /// Width of the longest line and number of lines.
    pub fn dim(&self) -> IVec2 {
        let w = self
            .lines
            .iter()
            .map(|a| a.chars().count())
            .max()
            .unwrap_or(0);
        ivec2(w as i32, self.lines.len() as i32)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(|a| a.as_str())
    }
}
