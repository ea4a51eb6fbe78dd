//! The "Add new user" form: six text fields, one of them focused.

use std::path::{Path, PathBuf};

use crate::api::NewUser;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddUserField {
    Name,
    Email,
    Phone,
    PositionId,
    Token,
    Photo,
}

impl AddUserField {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::PositionId,
        Self::Token,
        Self::Photo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::PositionId => "Position ID",
            Self::Token => "Token",
            Self::Photo => "Photo (path)",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddUserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position_id: String,
    pub token: String,
    pub photo_path: String,
    /// Index into [`AddUserField::ALL`].
    pub focus: usize,
}

impl AddUserForm {
    pub fn focused(&self) -> AddUserField {
        AddUserField::ALL[self.focus % AddUserField::ALL.len()]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % AddUserField::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        let n = AddUserField::ALL.len();
        self.focus = (self.focus + n - 1) % n;
    }

    pub fn value(&self, field: AddUserField) -> &str {
        match field {
            AddUserField::Name => &self.name,
            AddUserField::Email => &self.email,
            AddUserField::Phone => &self.phone,
            AddUserField::PositionId => &self.position_id,
            AddUserField::Token => &self.token,
            AddUserField::Photo => &self.photo_path,
        }
    }

    fn value_mut(&mut self, field: AddUserField) -> &mut String {
        match field {
            AddUserField::Name => &mut self.name,
            AddUserField::Email => &mut self.email,
            AddUserField::Phone => &mut self.phone,
            AddUserField::PositionId => &mut self.position_id,
            AddUserField::Token => &mut self.token,
            AddUserField::Photo => &mut self.photo_path,
        }
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.focused();
        self.value_mut(field).push(c);
    }

    pub fn pop_char(&mut self) {
        let field = self.focused();
        self.value_mut(field).pop();
    }

    /// Name of the selected photo file, shown under the form.
    pub fn photo_file_name(&self) -> Option<String> {
        let raw = self.photo_path.trim();
        if raw.is_empty() {
            return None;
        }
        Path::new(raw)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// Split the form into the body fields and the token, which is sent
    /// separately as a header.
    pub fn to_submission(&self) -> (NewUser, String) {
        let photo = self.photo_path.trim();
        let user = NewUser {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            position_id: self.position_id.clone(),
            photo: (!photo.is_empty()).then(|| PathBuf::from(photo)),
        };
        (user, self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = AddUserForm::default();
        form.push_char('A');
        form.focus_next();
        form.push_char('a');
        form.push_char('@');
        form.pop_char();
        assert_eq!(form.name, "A");
        assert_eq!(form.email, "a");
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = AddUserForm::default();
        form.focus_prev();
        assert_eq!(form.focused(), AddUserField::Photo);
        form.focus_next();
        assert_eq!(form.focused(), AddUserField::Name);
    }

    #[test]
    fn submission_moves_token_out_of_body() {
        let form = AddUserForm {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            phone: "+380501234567".into(),
            position_id: "1".into(),
            token: "tok".into(),
            photo_path: "  ".into(),
            focus: 0,
        };
        let (user, token) = form.to_submission();
        assert_eq!(token, "tok");
        assert!(user.photo.is_none());
        assert!(user.text_fields().iter().all(|(_, v)| *v != "tok"));
    }

    #[test]
    fn photo_name_is_last_path_component() {
        let form = AddUserForm {
            photo_path: "/home/ann/pics/me.jpg".into(),
            ..Default::default()
        };
        assert_eq!(form.photo_file_name().as_deref(), Some("me.jpg"));
        assert_eq!(
            form.to_submission().0.photo,
            Some(PathBuf::from("/home/ann/pics/me.jpg"))
        );
    }
}
