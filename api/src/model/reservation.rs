use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{ReservationId, RoomId, UserId},
    reservation::{
        event::{CreateReservation, UpdateReservation},
        Reservation, ReservationRoom, ReservationStatus,
    },
};
use serde::{Deserialize, Serialize};

/// Wire format for times is "HH:MM", matching the calendar front end.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(length(min = 1, max = 200))]
    pub title: String,
    #[garde(skip)]
    #[serde(default)]
    pub description: String,
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[garde(skip)]
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

#[derive(new)]
pub struct CreateReservationRequestWithIds(RoomId, UserId, CreateReservationRequest);

impl From<CreateReservationRequestWithIds> for CreateReservation {
    fn from(value: CreateReservationRequestWithIds) -> Self {
        let CreateReservationRequestWithIds(
            room_id,
            user_id,
            CreateReservationRequest {
                title,
                description,
                date,
                start_time,
                end_time,
            },
        ) = value;
        CreateReservation {
            room_id,
            reserved_by: user_id,
            title,
            description,
            date,
            start_time,
            end_time,
        }
    }
}

/// Staff-only variant naming both the room and the user being booked for.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateReservationRequest {
    #[garde(skip)]
    pub room_id: RoomId,
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1, max = 200))]
    pub title: String,
    #[garde(skip)]
    #[serde(default)]
    pub description: String,
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[garde(skip)]
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl From<AdminCreateReservationRequest> for CreateReservation {
    fn from(value: AdminCreateReservationRequest) -> Self {
        let AdminCreateReservationRequest {
            room_id,
            user_id,
            title,
            description,
            date,
            start_time,
            end_time,
        } = value;
        CreateReservation {
            room_id,
            reserved_by: user_id,
            title,
            description,
            date,
            start_time,
            end_time,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    #[garde(skip)]
    pub room_id: RoomId,
    #[garde(length(min = 1, max = 200))]
    pub title: String,
    #[garde(skip)]
    #[serde(default)]
    pub description: String,
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[garde(skip)]
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

#[derive(new)]
pub struct UpdateReservationRequestWithId(ReservationId, UpdateReservationRequest);

impl From<UpdateReservationRequestWithId> for UpdateReservation {
    fn from(value: UpdateReservationRequestWithId) -> Self {
        let UpdateReservationRequestWithId(
            reservation_id,
            UpdateReservationRequest {
                room_id,
                title,
                description,
                date,
                start_time,
                end_time,
            },
        ) = value;
        UpdateReservation {
            reservation_id,
            room_id,
            title,
            description,
            date,
            start_time,
            end_time,
        }
    }
}

// The status arrives as a raw string so an unrecognized value can be reported
// as its own rejection rather than a generic deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationStatusRequest {
    pub status: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub reserved_by: UserId,
    pub user_name: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub room: ReservationRoomResponse,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            reservation_id,
            reserved_by,
            title,
            description,
            date,
            start_time,
            end_time,
            status,
            created_at,
            updated_at,
            room,
        } = value;
        Self {
            reservation_id,
            reserved_by: reserved_by.user_id,
            user_name: reserved_by.user_name,
            title,
            description,
            date,
            start_time,
            end_time,
            status: status.to_string(),
            created_at,
            updated_at,
            room: room.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRoomResponse {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub location: String,
    pub is_active: bool,
}

impl From<ReservationRoom> for ReservationRoomResponse {
    fn from(value: ReservationRoom) -> Self {
        let ReservationRoom {
            room_id,
            name,
            capacity,
            location,
            is_active,
        } = value;
        Self {
            room_id,
            name,
            capacity,
            location,
            is_active,
        }
    }
}

pub fn parse_status(raw: &str) -> Result<ReservationStatus, shared::error::AppError> {
    raw.parse()
        .map_err(|_| shared::error::AppError::InvalidStatus(raw.to_string()))
}
