//! Fixed text tables used by the reply templates

/// Motivational quotes, picked uniformly at random
pub const QUOTES: [&str; 8] = [
    "\"Take care of your body. It's the only place you have to live.\" - Jim Rohn",
    "\"Small steps every day add up to big results.\"",
    "\"You don't have to be great to start, but you have to start to be great.\" - Zig Ziglar",
    "\"Rest when you're weary. Refresh and renew yourself, your body, your mind, your spirit.\" - Ralph Marston",
    "\"Almost everything will work again if you unplug it for a few minutes, including you.\" - Anne Lamott",
    "\"The greatest wealth is health.\" - Virgil",
    "\"Progress, not perfection.\"",
    "\"Believe you can and you're halfway there.\" - Theodore Roosevelt",
];

/// Short wellness facts offered when nothing needs logging
pub const WELLNESS_FACTS: [&str; 6] = [
    "Even mild dehydration can lower your concentration and mood.",
    "Adults generally need 7-9 hours of sleep for full recovery.",
    "A 10-minute walk after meals helps steady blood sugar.",
    "Two minutes of slow breathing can noticeably lower your heart rate.",
    "Writing down three things you're grateful for can improve sleep quality.",
    "Regular exercise can ease period cramps for many people.",
];
