use std::path::Path;

const RESET: &str = "\x1B[0m";

/// Display colors the prompt rotates through. Purely cosmetic.
const PALETTE: [&str; 6] = [
    "\x1B[31m", "\x1B[32m", "\x1B[33m", "\x1B[34m", "\x1B[35m", "\x1B[36m",
];

/// Renders `<cwd>: ` before each read.
#[derive(Debug)]
pub(crate) struct Prompt {
    color: bool,
    next: usize,
}

impl Prompt {
    pub(crate) fn new(color: bool) -> Self {
        Self { color, next: 0 }
    }

    pub(crate) fn render(&mut self, cwd: &Path) -> String {
        if !self.color {
            return format!("{}: ", cwd.display());
        }
        let color = PALETTE[self.next % PALETTE.len()];
        self.next = self.next.wrapping_add(1);
        format!("{}{}: {}", color, cwd.display(), RESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_prompt() {
        let mut prompt = Prompt::new(false);
        assert_eq!(prompt.render(Path::new("/tmp")), "/tmp: ");
        assert_eq!(prompt.render(Path::new("/tmp")), "/tmp: ");
    }

    #[test]
    fn test_colors_rotate() {
        let mut prompt = Prompt::new(true);
        let first = prompt.render(Path::new("/"));
        assert_eq!(first, "\x1B[31m/: \x1B[0m");

        let rest: Vec<String> = (0..PALETTE.len()).map(|_| prompt.render(Path::new("/"))).collect();
        assert_ne!(rest[0], first);
        // wraps around after a full cycle
        assert_eq!(rest[PALETTE.len() - 1], first);
    }
}
