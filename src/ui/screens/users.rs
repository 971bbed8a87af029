use dioxus::prelude::*;

use crate::app::Backends;
use crate::domain::entities::user::User;
use crate::ui::screens::crud_screen::{crud_screen, ScreenDef};
use crate::ui::view::{Column, FilterDef, InputKind};

pub fn user_screen() -> ScreenDef<User> {
    ScreenDef {
        title: "Users",
        columns: vec![
            Column::from_schema("id"),
            Column::from_schema("name"),
            Column::from_schema("email").input(InputKind::Email),
            Column::from_schema("role"),
        ],
        filters: vec![
            FilterDef::for_field::<User>("name"),
            FilterDef::for_field::<User>("email"),
            FilterDef::for_field::<User>("role"),
        ],
    }
}

#[component]
pub fn UsersScreen() -> Element {
    let backends = use_context::<Backends>();
    crud_screen(user_screen(), backends.users.clone(), backends.settings.clone())
}
