//! Canned replies, greetings, jokes and games of chance

use rand::seq::SliceRandom;
use rand::Rng;

use crate::handler::classifier::{ClassifierGroup, GroupKind, Matcher, Trigger};

/// Replies to `hi`, `hello` and `hey`
pub const GREETINGS: [&str; 7] = [
    "Hello there!",
    "Hi!",
    "Hey, good to see you.",
    "Greetings, human.",
    "Howdy!",
    "Hello! What can I do for you?",
    "Hi there, type help if you get stuck.",
];

/// Jokes printed by `joke`
pub const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are 10 kinds of people: those who understand binary and those who don't.",
    "A SQL query walks into a bar, goes up to two tables and asks: may I join you?",
    "I would tell you a UDP joke, but you might not get it.",
    "Why was the function sad? It didn't get called.",
    "Knock knock. Race condition. Who's there?",
];

const REPLIES: &[(&[&str], &str)] = &[
    (&["how are you", "how are you?"], "I am feeling like a ones and zeros kind of day."),
    (&["thank you", "thanks"], "You're welcome!"),
    (&["good morning"], "Good morning! Coffee first, commands second."),
    (&["good night"], "Good night. Don't let the bed bugs byte."),
    (&["what is your name", "who are you"], "My name is Cyder. I am a console."),
    (&["i love you"], "That's nice, but I'm a program."),
    (&["hello world"], "Hello to you too."),
    (&["what's up", "whats up", "sup"], "Not much, just waiting for input."),
    (&["meaning of life", "what is the meaning of life"], "42"),
    (&["knock knock"], "Who's there?"),
];

pub fn group() -> ClassifierGroup {
    let mut matchers = vec![
        Matcher::new("greeting", Trigger::Exact(&["hi", "hello", "hey"]), |_, ctx| {
            let index = rand::thread_rng().gen_range(0..GREETINGS.len());
            ctx.printer.println(GREETINGS[index]);
            Ok(true)
        }),
        Matcher::new(
            "coin flip",
            Trigger::Exact(&["flip a coin", "coin flip", "flip coin", "flip"]),
            |_, ctx| {
                let side = if rand::thread_rng().gen_bool(0.5) {
                    "Heads"
                } else {
                    "Tails"
                };
                ctx.printer.println(side);
                Ok(true)
            },
        ),
        Matcher::new(
            "die roll",
            Trigger::Exact(&["roll a die", "roll die", "roll dice", "dice"]),
            |_, ctx| {
                ctx.printer.println(rand::thread_rng().gen_range(1..=6));
                Ok(true)
            },
        ),
        Matcher::new("joke", Trigger::Exact(&["joke", "tell me a joke"]), |_, ctx| {
            if let Some(joke) = JOKES.choose(&mut rand::thread_rng()) {
                ctx.printer.println(joke);
            }
            Ok(true)
        }),
    ];

    matchers.extend(REPLIES.iter().map(|(phrases, reply)| {
        let (phrases, reply) = (*phrases, *reply);
        Matcher::new(phrases[0], Trigger::Exact(phrases), move |_, ctx| {
            ctx.printer.println(reply);
            Ok(true)
        })
    }));

    ClassifierGroup::new(GroupKind::GeneralPrints, matchers)
}
