use serenity::builder::CreateEmbed;
use serenity::model::Colour;

/// Embed colours used by command responses.
pub struct EmbedColours;

impl EmbedColours {
    pub const POSITIVE: Colour = Colour(0x57c782);
    pub const NEUTRAL: Colour = Colour(0xFFFF55);
    pub const ERROR: Colour = Colour(0xAA0000);
}

pub fn please_wait(description: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Please wait")
        .description(description)
        .colour(EmbedColours::NEUTRAL)
}

pub fn success(description: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new()
        .title("Success")
        .description(description)
        .colour(EmbedColours::POSITIVE)
}

pub fn error(description: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new()
        .title("Error")
        .description(description)
        .colour(EmbedColours::ERROR)
}
