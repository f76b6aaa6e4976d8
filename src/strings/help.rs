//! # Help Text
//!
//! Displayed to the user via the `!help` command.

pub const MAIN: &str = concat!(
    "**🐘 Mastodon Bridge Help**\n",
    "\n",
    "* `!help` opens this menu\n",
    "* `!echo` your message\n",
    "* `!home` your home mastodon timeline\n",
    "* `!local` your local mastodon timeline\n",
    "* `!public` your public mastodon timeline\n",
    "* `!reload` load your current timelines\n",
    "* `!cron` post the home timeline here periodically\n",
    "* `!stop` stop the periodic posts in this room\n"
);
