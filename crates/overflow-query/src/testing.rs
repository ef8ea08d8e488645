//! Record fixtures with fixed ids and timestamps.

use chrono::{DateTime, Duration, TimeZone, Utc};
use overflow_core::{
    Answer, AnswerId, Forum, ForumRecord, Question, QuestionId, Tag, TagId, User, UserId,
};

fn at_minute(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("fixture epoch must be valid")
        + Duration::minutes(minute)
}

pub(crate) fn forum(records: Vec<ForumRecord>) -> Forum {
    Forum::from_records(records)
}

pub(crate) fn user(id: &str, username: &str, reputation: i64) -> ForumRecord {
    let mut user = User::new(format!("{username}@example.com"), username, "hash");
    user.id = UserId::from(id);
    user.reputation = reputation;
    user.created_at = at_minute(0);
    user.updated_at = at_minute(0);
    ForumRecord::User(user)
}

pub(crate) fn question(
    id: &str,
    author: &str,
    title: &str,
    tags: &[&str],
    minute: i64,
) -> ForumRecord {
    let mut question = Question::new(
        UserId::from(author),
        title,
        format!("Body of `{title}`, padded past the minimum length."),
        tags.iter().map(|t| t.to_string()).collect(),
    );
    question.id = QuestionId::from(id);
    question.created_at = at_minute(minute);
    question.updated_at = at_minute(minute);
    ForumRecord::Question(question)
}

pub(crate) fn answer(
    id: &str,
    question: &str,
    author: &str,
    votes: i64,
    accepted: bool,
    minute: i64,
) -> ForumRecord {
    let mut answer = Answer::new(
        QuestionId::from(question),
        UserId::from(author),
        "An answer body that is long enough to be valid.",
    );
    answer.id = AnswerId::from(id);
    answer.votes = votes;
    answer.is_accepted = accepted;
    answer.created_at = at_minute(minute);
    answer.updated_at = at_minute(minute);
    ForumRecord::Answer(answer)
}

pub(crate) fn tag(name: &str, count: u64) -> ForumRecord {
    let mut tag = Tag::new(name, None);
    tag.id = TagId::from(format!("t-{name}"));
    tag.count = count;
    tag.created_at = at_minute(0);
    ForumRecord::Tag(tag)
}

pub(crate) fn described_tag(name: &str, count: u64, description: &str) -> ForumRecord {
    match tag(name, count) {
        ForumRecord::Tag(tag) => ForumRecord::Tag(tag.with_description(description)),
        other => other,
    }
}
