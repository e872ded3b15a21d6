//! Discord Embed Builder
//!
//! Maps the platform-neutral `Embed` onto serenity's builder.

use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use sigil_core::Embed;

pub fn to_create_embed(embed: &Embed) -> CreateEmbed {
    let mut out = CreateEmbed::new();
    if let Some(title) = &embed.title {
        out = out.title(title);
    }
    if let Some(url) = &embed.url {
        out = out.url(url);
    }
    if let Some(color) = embed.color {
        out = out.colour(color);
    }
    for field in &embed.fields {
        out = out.field(&field.name, &field.value, field.inline);
    }
    if let Some(image) = &embed.image_url {
        out = out.image(image);
    }
    if let Some(footer) = &embed.footer {
        out = out.footer(CreateEmbedFooter::new(footer));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_every_part() {
        let embed = Embed::new()
            .title("xkcd: Exploits of a Mom")
            .url("https://xkcd.com/327/")
            .field("Usage:", "`!xkcd`", false)
            .image("https://imgs.xkcd.com/comics/exploits_of_a_mom.png")
            .footer("#327, posted 2007-10-10");

        let json = serde_json::to_value(to_create_embed(&embed)).unwrap();
        assert_eq!(json["title"], "xkcd: Exploits of a Mom");
        assert_eq!(json["url"], "https://xkcd.com/327/");
        assert_eq!(json["fields"][0]["name"], "Usage:");
        assert_eq!(json["image"]["url"], "https://imgs.xkcd.com/comics/exploits_of_a_mom.png");
        assert_eq!(json["footer"]["text"], "#327, posted 2007-10-10");
    }

    #[test]
    fn empty_embed_has_no_title() {
        let json = serde_json::to_value(to_create_embed(&Embed::new())).unwrap();
        assert!(json.get("title").map_or(true, |t| t.is_null()));
    }
}
