//! Delivery of router replies as embeds and reactions.

use {
    serenity::all::{
        Colour, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, CreateMessage, Http, Message,
        ReactionType,
    },
    tracing::warn,
};

use {
    warden_channels::{Glyphs, RenderedNotice, Tone},
    warden_registry::Reply,
};

pub fn colour(tone: Tone) -> Colour {
    match tone {
        Tone::Success => Colour::from_rgb(46, 204, 113),
        Tone::Warning => Colour::from_rgb(241, 196, 15),
        Tone::Muted => Colour::from_rgb(79, 84, 92),
        Tone::Archive => Colour::from_rgb(128, 128, 128),
    }
}

pub fn embed(rendered: &RenderedNotice) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .description(&rendered.description)
        .colour(colour(rendered.tone));
    if let Some((name, icon_url)) = &rendered.author {
        let mut author = CreateEmbedAuthor::new(name);
        if let Some(url) = icon_url {
            author = author.icon_url(url);
        }
        embed = embed.author(author);
    }
    if let Some(footer) = &rendered.footer {
        embed = embed.footer(CreateEmbedFooter::new(footer));
    }
    embed
}

/// Send each reply in order. Notices go to the message's channel, reactions
/// onto the message itself. A failed send is logged and the rest still go out.
pub async fn deliver(http: &Http, message: &Message, replies: &[Reply], glyphs: &Glyphs) {
    for reply in replies {
        let result = match reply {
            Reply::Notice(notice) => {
                let builder = CreateMessage::new().embed(embed(&notice.render(glyphs)));
                message
                    .channel_id
                    .send_message(http, builder)
                    .await
                    .map(|_| ())
            },
            Reply::React(reaction) => message
                .react(http, ReactionType::Unicode(reaction.emoji().to_string()))
                .await
                .map(|_| ()),
        };
        if let Err(e) = result {
            warn!(
                channel_id = %message.channel_id,
                message_id = %message.id,
                error = %e,
                "failed to deliver reply"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case(Tone::Success, 0x2ecc71)]
    #[case(Tone::Warning, 0xf1c40f)]
    #[case(Tone::Muted, 0x4f545c)]
    #[case(Tone::Archive, 0x808080)]
    fn tone_colours(#[case] tone: Tone, #[case] hex: u32) {
        assert_eq!(colour(tone).0, hex);
    }
}
