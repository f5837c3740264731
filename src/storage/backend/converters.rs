use sea_orm::ActiveValue::Set;

use crate::storage::models::{Link, User, VisitEvent};
use migration::entities::{link, log, user};

pub fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        owner_id: model.user_id,
        url: model.url,
        short_token: model.short_token,
        active: model.active,
        created_at: model.created_at,
    }
}

pub fn link_to_active_model(link: &Link) -> link::ActiveModel {
    link::ActiveModel {
        id: Set(link.id),
        user_id: Set(link.owner_id),
        url: Set(link.url.clone()),
        short_token: Set(link.short_token.clone()),
        active: Set(link.active),
        created_at: Set(link.created_at),
    }
}

pub fn event_to_active_model(event: &VisitEvent) -> log::ActiveModel {
    log::ActiveModel {
        id: Set(event.id),
        actor_id: Set(event.actor_id),
        action: Set(event.action.as_str().to_string()),
        payload: Set(event.payload.clone()),
        created_at: Set(event.created_at),
    }
}

pub fn model_to_user(model: user::Model) -> User {
    User {
        id: model.id,
        fullname: model.fullname,
        email: model.email,
        password_hash: model.password,
        active: model.active,
        created_at: model.created_at,
    }
}

pub fn user_to_active_model(user: &User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(user.id),
        fullname: Set(user.fullname.clone()),
        email: Set(user.email.clone()),
        password: Set(user.password_hash.clone()),
        active: Set(user.active),
        created_at: Set(user.created_at),
    }
}
