use crate::domain::model::ExamRequest;

const ANSWER_KEY_INSTRUCTION: &str = "Add an 'Answer Key' section at the end.";
const NO_ANSWERS_INSTRUCTION: &str = "Do not include answers.";
const FORMAT_INSTRUCTION: &str = "Format as a numbered list.";

/// Renders the instruction sent to the generation API. The topic is
/// interpolated verbatim.
pub fn build_prompt(request: &ExamRequest) -> String {
    let answers = if request.include_answer_key {
        ANSWER_KEY_INSTRUCTION
    } else {
        NO_ANSWERS_INSTRUCTION
    };

    format!(
        "Generate a math exam for a primary school student with {} questions on the topic of {}.\n{}\n{}",
        request.count, request.topic, answers, FORMAT_INSTRUCTION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(topic: &str, count: u8, include_answer_key: bool) -> ExamRequest {
        ExamRequest {
            topic: topic.to_string(),
            count,
            include_answer_key,
        }
    }

    #[test]
    fn test_prompt_with_answer_key() {
        let prompt = build_prompt(&request("Fractions", 5, true));
        assert_eq!(
            prompt,
            "Generate a math exam for a primary school student with 5 questions on the topic of Fractions.\nAdd an 'Answer Key' section at the end.\nFormat as a numbered list."
        );
    }

    #[test]
    fn test_prompt_without_answer_key() {
        let prompt = build_prompt(&request("Fractions", 5, false));
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Do not include answers.");
        assert!(!prompt.contains("Answer Key"));
    }

    #[test]
    fn test_prompt_contains_exact_count_and_topic() {
        for count in [1u8, 17, 50] {
            let topic = "Long division & <remainders>";
            let prompt = build_prompt(&request(topic, count, false));
            assert!(prompt.contains(&format!("with {} questions", count)));
            assert!(prompt.contains(topic));
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let req = request("Geometry", 12, true);
        assert_eq!(build_prompt(&req), build_prompt(&req.clone()));
    }
}
