use crate::core::content::ToolOutput;

pub const CHICKEN_JOKE: &str = "Why did the chicken cross the road? To get to the other side!";

pub fn joke() -> ToolOutput {
    ToolOutput::text(CHICKEN_JOKE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joke_is_fixed_across_calls() {
        for _ in 0..3 {
            assert_eq!(joke().first_text(), CHICKEN_JOKE);
        }
    }
}
