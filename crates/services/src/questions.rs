use rand::Rng;
use rand::seq::IndexedRandom;
use speakcheck_models::{Category, MediaAsset, MediaKind, Question};
use thiserror::Error;

const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400/png";

const INTRO_PROMPTS: &[(&str, &str)] = &[
    ("intro_1", "What is your favorite hobby, and why do you enjoy it?"),
    ("intro_2", "What is your favorite way to spend the weekend?"),
    ("intro_3", "Which birthday was your favorite and why?"),
    ("intro_4", "What famous person would you most like to meet?"),
    ("intro_5", "What's your favorite holiday? Why?"),
    ("intro_6", "Talk about your best friend."),
    ("intro_7", "Talk about your pets. If you don't have any, would you like one?"),
    ("intro_8", "Talk about the members of your family."),
    ("intro_9", "What's the best gift you've ever received?"),
    ("intro_10", "What's your favorite TV show? Describe it."),
    ("intro_11", "What's the most memorable trip you have taken?"),
    ("intro_12", "What's your favorite food from another culture?"),
    ("intro_13", "If you could have a superpower, what would you choose?"),
    ("intro_14", "If you could meet a character from a book, TV show, or movie, who would you want to meet?"),
    ("intro_15", "What do you want to do for work when you get older?"),
    ("intro_16", "If you could live anywhere in the world, where would you want to live?"),
    ("intro_17", "What type of music do you like the most and the least?"),
];

const FREE_PROMPTS: &[(&str, &str)] = &[
    ("free_1", "How could schools be improved?"),
    ("free_2", "Is traveling important? Why or why not?"),
    ("free_3", "If you could change one thing about your country, what would it be?"),
    ("free_4", "Do you think technology has made life better or worse? Why?"),
    ("free_5", "Is it better to live in a big city or a small town? Explain."),
    ("free_6", "If you had to invent a holiday, what would you celebrate?"),
    ("free_7", "What do you think life will be like in 50 years?"),
    ("free_8", "Should everyone learn a second language? Why or why not?"),
    ("free_9", "What do you think is the biggest problem in the world today?"),
    ("free_10", "At what age should children be allowed to have a smartphone? Why?"),
    ("free_11", "What is one invention that has changed the world the most? Explain."),
    ("free_12", "What is something that should be taught in schools but isn't?"),
    ("free_13", "What is a job that you think won't exist in the future?"),
    ("free_14", "What is a job that you think will not be replaced by AI or robots?"),
    ("free_15", "What would the perfect city look like?"),
    ("free_16", "What is something that should be studied about in school?"),
    ("free_17", "Should there be a limit on how much money a person can make?"),
];

const MEDIA_PROMPTS: &[(&str, &str)] = &[
    ("media_1", "How do the educational styles in each photo compare? How is each style effective?"),
    ("media_2", "Compare the photos and discuss how people's experiences with technology might differ depending on their age and background."),
    ("media_3", "How do these two different hobbies benefit the users? How are they similar and different?"),
    ("media_4", "Compare the photos and say how the type of work in each image might affect a person's lifestyle."),
    ("media_5", "Compare the photos and say what might make each type of travel experience enjoyable."),
    ("media_6", "Why might each person be doing these activities? Do you think everyone is enjoying the work?"),
    ("media_7", "Compare the photos and discuss how life events can change a person's idea of happiness and purpose."),
    ("media_8", "Discuss what's happening in each photo and how technology has changed how people work."),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionBankError {
    #[error("question bank has no prompts in category {0:?}")]
    EmptyCategory(Category),
}

/// Fixed catalog of prompts grouped by category.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// The built-in catalog: 17 intro, 17 free and 8 picture prompts.
    pub fn standard() -> Self {
        let intro = INTRO_PROMPTS
            .iter()
            .map(|(id, text)| prompt(id, Category::Intro, text, 30, 90, None));
        let free = FREE_PROMPTS
            .iter()
            .map(|(id, text)| prompt(id, Category::Free, text, 30, 120, None));
        let media = MEDIA_PROMPTS.iter().map(|(id, text)| {
            let asset = MediaAsset {
                kind: MediaKind::Image,
                url: PLACEHOLDER_IMAGE.to_string(),
                duration: Some(30),
            };
            prompt(id, Category::Media, text, 30, 120, Some(asset))
        });

        Self::new(intro.chain(free).chain(media).collect())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn in_category(&self, category: Category) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.category == category)
            .collect()
    }

    /// Draws one prompt uniformly at random from each category, in
    /// category order.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Question>, QuestionBankError> {
        Category::ALL
            .iter()
            .map(|&category| {
                self.in_category(category)
                    .choose(&mut *rng)
                    .map(|q| (*q).clone())
                    .ok_or(QuestionBankError::EmptyCategory(category))
            })
            .collect()
    }

    /// [`select`](Self::select) with the thread-local RNG.
    pub fn select_questions(&self) -> Result<Vec<Question>, QuestionBankError> {
        self.select(&mut rand::rng())
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::standard()
    }
}

fn prompt(
    id: &str,
    category: Category,
    text: &str,
    preparation_time: u32,
    response_time: u32,
    media: Option<MediaAsset>,
) -> Question {
    Question {
        id: id.to_string(),
        category,
        text: text.to_string(),
        preparation_time,
        response_time,
        media,
    }
}
