//! # 시스템 모듈 테스트
//!
//! 구성 설정 검증과 오류 표시 단위테스트
