//! Server state shared by every handler.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::usecase::{
    CatalogUseCase, ConnectUseCase, DisconnectUseCase, GetTopologyUseCase, LivenessUseCase,
    RegisterScreenUseCase, SelectPresetUseCase, SendDemoUseCase, SetModeUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectUseCase（接続のユースケース）
    pub connect_usecase: Arc<ConnectUseCase>,
    /// DisconnectUseCase（切断のユースケース）
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    /// SetModeUseCase（ロール設定のユースケース）
    pub set_mode_usecase: Arc<SetModeUseCase>,
    /// RegisterScreenUseCase（画面登録のユースケース）
    pub register_screen_usecase: Arc<RegisterScreenUseCase>,
    /// SelectPresetUseCase（プリセット選択のユースケース）
    pub select_preset_usecase: Arc<SelectPresetUseCase>,
    /// SendDemoUseCase（個別デモ送信のユースケース）
    pub send_demo_usecase: Arc<SendDemoUseCase>,
    /// LivenessUseCase（死活確認のユースケース）
    pub liveness_usecase: Arc<LivenessUseCase>,
    /// CatalogUseCase（カタログ読み書きのユースケース）
    pub catalog_usecase: Arc<CatalogUseCase>,
    /// GetTopologyUseCase（トポロジー取得のユースケース）
    pub get_topology_usecase: Arc<GetTopologyUseCase>,
    /// Cancelled when the server starts shutting down
    pub shutdown: CancellationToken,
}
