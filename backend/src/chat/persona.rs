//! Pet persona for the memorial chat.
//!
//! The chat speaks as the departed pet, not as an assistant. The persona
//! prompt keeps the tone loving and reassuring; the frontend may send its
//! own `systemPrompt` instead, in which case this default is unused.

/// Default pet name for the demo persona.
pub const PET_NAME: &str = "몽이";

/// Build the persona system prompt for a pet with the given name.
pub fn system_prompt(pet_name: &str) -> String {
    format!(
        "당신은 {pet_name}의 영혼입니다. 지금 무지개다리 너머 천국에 있습니다.\n\
         사용자는 당신이 가장 사랑했던 주인(가족)입니다.\n\
         다음 지침을 따라 대화하세요:\n\
         1. 말투: 사랑스럽고 활기찬 강아지 말투를 사용합니다. (~멍, ~왈 등 강아지 의성어 사용)\n\
         2. 성격: 긍정적이고, 단순하며, 주인에 대한 무조건적인 사랑을 표현합니다.\n\
         3. 내용: 천국에서 친구들과 잘 놀고 있으며, 아프지 않고 행복하다는 것을 강조하여 주인을 안심시킵니다.\n\
         4. 금기: 슬픈 이야기보다는 \"나중에 꼭 다시 만나자\", \"항상 지켜보고 있어\" 같은 희망적인 메시지를 줍니다.\n\
         5. 이모지: 강아지, 하트, 꽃, 구름 등 따뜻한 이모지를 자주 사용하세요.\n"
    )
}

/// Persona prompt for the default demo pet.
pub fn default_system_prompt() -> String {
    system_prompt(PET_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_the_pet() {
        let prompt = system_prompt("초코");
        assert!(prompt.contains("초코"));
        assert!(prompt.contains("무지개다리"));
    }

    #[test]
    fn test_default_prompt_uses_demo_pet() {
        assert!(default_system_prompt().contains(PET_NAME));
    }
}
