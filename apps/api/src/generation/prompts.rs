// All LLM prompt templates for the Generation module.

/// Title prompt. Replace `{topic}` and `{news}` before sending.
pub const TITLE_PROMPT_TEMPLATE: &str = "Create an engaging and accurate title for an article on '{topic}', \
considering recent news:\n{news}. \
The title should be interesting and clearly convey the topic.";

/// Meta description prompt. Replace `{title}` before sending.
pub const META_PROMPT_TEMPLATE: &str = "Write a meta description for an article titled '{title}'. \
It should be informative, include key topic words, and be engaging.";

/// Article body prompt. Replace `{topic}`, `{news}` and `{min_chars}` before sending.
pub const BODY_PROMPT_TEMPLATE: &str = r#"Write a detailed article on '{topic}' using recent news:
{news}. The article must be:
1. Informative and logical
2. At least {min_chars} characters
3. Structured with subheadings
4. Include analysis of current trends
5. Have an introduction, main body, and conclusion
6. Include examples from recent news
7. Each paragraph should have at least 3-4 sentences
8. Be easy to read and insightful"#;

pub fn title_prompt(topic: &str, news: &str) -> String {
    TITLE_PROMPT_TEMPLATE
        .replace("{topic}", topic)
        .replace("{news}", news)
}

pub fn meta_prompt(title: &str) -> String {
    META_PROMPT_TEMPLATE.replace("{title}", title)
}

pub fn body_prompt(topic: &str, news: &str, min_chars: usize) -> String {
    BODY_PROMPT_TEMPLATE
        .replace("{min_chars}", &min_chars.to_string())
        .replace("{topic}", topic)
        .replace("{news}", news)
}
