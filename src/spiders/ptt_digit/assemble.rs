use super::extract::{first_value, FieldValues};
use super::model::{Post, PostStub, Reply};
use super::selectors::{PostField, ReplyField};

/// Completes a post from its hub stub, the fields read from its page and its replies.
///
/// Single-valued fields take their first match, or an empty string. `content` joins every
/// matched text node in document order without altering them.
pub fn assemble(stub: PostStub, fields: &FieldValues<PostField>, replies: Vec<Reply>) -> Post {
    let content = fields
        .get(&PostField::Content)
        .map(|parts| parts.concat())
        .unwrap_or_default();

    Post {
        url: stub.url,
        author: first_value(fields, PostField::Author),
        title: first_value(fields, PostField::Title),
        datetime: first_value(fields, PostField::Datetime),
        content,
        reply_count_hint: stub.reply_count_hint,
        replies,
    }
}

pub fn assemble_reply(fields: &FieldValues<ReplyField>) -> Reply {
    Reply {
        tag: first_value(fields, ReplyField::Tag),
        author: first_value(fields, ReplyField::Author),
        content: first_value(fields, ReplyField::Content),
        datetime: first_value(fields, ReplyField::Datetime),
    }
}
