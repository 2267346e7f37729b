use rand::RngExt;

/// Number of distinct PINs (0000–9999).
const CODE_SPACE: u32 = 10_000;

/// Produces candidate access codes. Uniqueness against live pending tokens
/// is the issuance usecase's job, not the generator's.
pub trait CodeGenerator: Send + Sync {
    /// A 4-digit zero-padded numeric string, uniform over [0000, 9999].
    fn generate(&self) -> String;
}

#[derive(Clone, Copy, Default)]
pub struct RandomPinGenerator;

impl CodeGenerator for RandomPinGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        format_pin(rng.random_range(0..CODE_SPACE))
    }
}

fn format_pin(n: u32) -> String {
    format!("{n:04}")
}
