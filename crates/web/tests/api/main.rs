mod health_check;
mod helpers;
mod logout;
mod protected;
mod token;
