//! Prompt templates for the two generation steps, parameterized only by the
//! app name and description.

pub fn prd_prompt(name: &str, description: &str) -> String {
    format!(
        r#"Act as a Senior Product Manager and Software Architect.
Write a highly detailed, structured PRD (Product Requirements Document) for an app called "{name}".

The app idea is: "{description}".

Answer in Markdown, optimized to be copied and pasted as a prompt for an AI engineer to build the app.

The document must contain these sections:
1. **Project Overview**: Executive summary.
2. **User Flow**: Step-by-step journey.
3. **Core Features**: Detailed must-have list.
4. **Suggested Technical Structure**:
   - Frontend (recommend React + Tailwind)
   - Backend (if needed, or mock/local storage)
   - Key libraries.
5. **UI Components**: List of required components.
6. **Color Scheme & Design**: Suggested palette.

Be technical, direct and inspiring."#
    )
}

pub fn icon_prompt(name: &str, description: &str) -> String {
    format!(
        r#"Create a high-quality, modern mobile app icon for an app named "{name}".
Description of app logic: {description}.
Style: Minimalist, vector art, gradient background, rounded corners (iOS style), professional, high resolution (1024x1024).
Do not include text inside the logo if possible, focus on a symbolic icon."#
    )
}
